use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The coordinate record an atom was read from.
///
/// Docking programs write receptor atoms as `ATOM` and ligand atoms as
/// `HETATM`; both carry the same fixed-column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// Standard polymer atom (`ATOM`).
    #[default]
    Atom,
    /// Hetero atom, typically a ligand or cofactor (`HETATM`).
    Hetatm,
}

/// One atom parsed from a fixed-column `ATOM`/`HETATM` line.
///
/// Coordinates are always present: a line whose coordinate columns cannot be
/// parsed never produces an `AtomRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomRecord {
    /// Record type the atom was read from.
    pub record: RecordType,
    /// Atom serial number. Defaults to 0 when the column is not an integer.
    pub serial: u32,
    /// Atom name (e.g., "C1", "N", "OA").
    pub name: String,
    /// Residue name (e.g., "UNL", "LIG", "ALA").
    pub res_name: String,
    /// Chain identifier; empty when the column is blank.
    pub chain: String,
    /// Residue sequence number. Defaults to 0 when the column is not an integer.
    pub res_seq: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Partial charge in elementary charge units (0.0 when absent).
    pub charge: f64,
    /// Element or AutoDock atom type.
    pub element: String,
}

impl AtomRecord {
    /// Creates an atom at the given position with empty identity fields.
    ///
    /// Useful for geometry-only callers and tests; parsed atoms are built by
    /// [`crate::core::io::atom_line::parse_atom_line`].
    pub fn at(serial: u32, name: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            record: RecordType::default(),
            serial,
            name: name.to_string(),
            res_name: String::new(),
            chain: String::new(),
            res_seq: 0,
            x,
            y,
            z,
            charge: 0.0,
            element: String::new(),
        }
    }

    /// The atom position as an `nalgebra` point.
    #[inline]
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl FromStr for RecordType {
    type Err = ();

    /// Parses a record keyword. Surrounding whitespace is ignored, case is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(RecordType::Atom),
            "HETATM" => Ok(RecordType::Hetatm),
            _ => Err(()),
        }
    }
}
