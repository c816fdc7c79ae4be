use thiserror::Error;

/// Malformed or missing input. Always the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid or missing user_id: {0}")]
    InvalidUserId(i64),

    #[error("invalid or missing assessment_id: {0}")]
    InvalidAssessmentId(i64),

    #[error("no answers provided")]
    EmptyAnswers,
}
