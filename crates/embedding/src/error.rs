use thiserror::Error;
use upstream::UpstreamError;

/// Errors from fetching a single embedding.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// The remote call failed or returned an unusable body.
    #[error("embedding request failed: {0}")]
    Upstream(#[from] UpstreamError),
    /// The embedder was handed text it refuses to embed.
    #[error("invalid embedding input: {0}")]
    InvalidInput(String),
}
