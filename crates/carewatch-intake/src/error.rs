use thiserror::Error;

use carewatch_core::error::ValidationError;
use carewatch_scoring::error::ScoringError;
use carewatch_storage::error::StorageError;

/// Why a submission was not accepted. Nothing is dispatched for any of them.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("scoring failed: {0}")]
    ScoringFailed(#[source] ScoringError),

    #[error("failed to persist assessment: {0}")]
    PersistFailed(#[source] StorageError),
}
