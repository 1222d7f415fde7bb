use thiserror::Error;
use upstream::UpstreamError;

#[derive(Debug, Clone, Error)]
pub enum LabelError {
    #[error("label request failed: {0}")]
    Upstream(#[from] UpstreamError),
    /// The service answered, but nothing usable was left after cleanup.
    #[error("label service returned an empty label")]
    EmptyLabel,
}
