use std::path::PathBuf;
use thiserror::Error;

/// Infrastructure failures around the intake manager.
///
/// Per-file rejections are not errors; they are reported as
/// [`crate::models::RejectReason`] values inside a batch outcome.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl IntakeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IntakeError::Io {
            path: path.into(),
            source,
        }
    }
}
