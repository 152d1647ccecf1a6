use lyrisync_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid value for {arg}: {value:?}")]
    InvalidNumber { arg: &'static str, value: String },

    #[error("Please provide a valid .lrc file, got {}", path.display())]
    NotLrcFile { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}
