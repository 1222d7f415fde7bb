use thiserror::Error;

/// Failures talking to a remote AI service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("HTTP request failed: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
    /// The service answered 2xx but the body did not have the expected shape.
    #[error("unexpected upstream response format: {0}")]
    Format(String),
    /// The client could not be built from the supplied settings.
    #[error("invalid upstream config: {0}")]
    InvalidConfig(String),
}

impl UpstreamError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Transport failures and 408/429/5xx are transient. Everything else
    /// (auth failures, bad requests, malformed bodies) fails fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Transport(_) => true,
            UpstreamError::Status { status, .. } => {
                matches!(*status, 408 | 429) || (500..=599).contains(status)
            }
            UpstreamError::Format(_) | UpstreamError::InvalidConfig(_) => false,
        }
    }
}
