use std::path::PathBuf;

use thiserror::Error;

use carewatch_core::error::ValidationError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid scoring policy: {0}")]
    InvalidPolicy(String),

    #[error("failed to read scoring policy {}: {source}", path.display())]
    PolicyIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("remote scoring failed: {0}")]
    Remote(String),
}
