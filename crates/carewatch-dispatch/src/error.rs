use thiserror::Error;

/// Failure of a single dispatch task. Logged at the task boundary and never
/// surfaced to the submitter.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("collaborator returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("email rendering failed: {0}")]
    Render(String),

    #[error("invalid email address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("email delivery failed: {0}")]
    Email(String),

    #[error("{0} not configured")]
    NotConfigured(&'static str),
}

impl From<tera::Error> for DispatchError {
    fn from(e: tera::Error) -> Self {
        DispatchError::Render(e.to_string())
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DispatchError::Timeout(e.to_string())
        } else {
            DispatchError::Transport(e.to_string())
        }
    }
}
