use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("model '{model}' not found")]
    ModelNotFound { model: String },
    #[error("failed to get model info for '{model}': {message}")]
    Fetch { model: String, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine home directory")]
    HomeDir,
}

pub type Result<T> = std::result::Result<T, ExportError>;
