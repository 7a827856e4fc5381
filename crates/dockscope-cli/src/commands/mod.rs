pub mod docking_box;
pub mod extract;
pub mod interactions;
pub mod play;
pub mod split;
pub mod summary;

use crate::error::{CliError, Result};
use dockscope::core::io::pdbqt::{DockingFile, ParsedDocking};
use dockscope::core::io::traits::load_text;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub(crate) async fn read_text(path: &Path) -> Result<String> {
    info!("Reading {:?}", path);
    load_text(path).await.map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub(crate) async fn read_docking(path: &Path) -> Result<ParsedDocking> {
    info!("Loading docking results from {:?}", path);
    DockingFile::load(path)
        .await
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
}

/// Writes `content` to `output`, or to stdout when no path is given.
pub(crate) async fn write_text(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, content).await?;
            info!("Wrote output to {:?}", path);
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub(crate) async fn write_json<T: Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_text(output, &json).await
}

/// Converts a validated 1-based CLI model number into a 0-based index.
pub(crate) fn model_index(model: u64) -> Result<usize> {
    usize::try_from(model)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .ok_or_else(|| CliError::Argument(format!("invalid model number: {model}")))
}
