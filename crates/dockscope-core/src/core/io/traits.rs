use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading docking result formats.
///
/// Implementors parse a whole text stream into a format-specific result;
/// docking output files are small enough to be read in one piece.
pub trait DockingFormat {
    /// The parsed representation of one file.
    type Output;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads and parses a file from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails. Malformed records are not errors;
    /// parsers skip them.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads and parses a file from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    ///
    /// # Return
    ///
    /// Returns the parsed file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Reads a whole text file on the tokio runtime's blocking-aware file API.
pub async fn load_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    tokio::fs::read_to_string(path).await
}
