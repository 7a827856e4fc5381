use dockscope::core::analysis::interactions::InteractionError;
use dockscope::engine::config::ConfigError;
use dockscope::engine::sequencer::SequencerError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Pose playback failed: {0}")]
    Sequencer(#[from] SequencerError),

    #[error("Failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn interactions(path: PathBuf, source: InteractionError) -> Self {
        CliError::FileParsing {
            path,
            source: source.into(),
        }
    }
}
