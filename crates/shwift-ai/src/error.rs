use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The credential is missing; no request was attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request to the completion service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion service returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Completion service returned an unreadable body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl SnapshotError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, SnapshotError::Configuration(_))
    }

    /// Anything that went wrong after a request was actually attempted.
    pub fn is_request_failure(&self) -> bool {
        !self.is_configuration()
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
