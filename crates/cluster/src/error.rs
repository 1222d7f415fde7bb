use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Keywords and embeddings must be parallel slices.
    #[error("got {keywords} keywords but {embeddings} embeddings")]
    LengthMismatch { keywords: usize, embeddings: usize },
    #[error("similarity threshold must be finite, got {0}")]
    InvalidThreshold(f32),
}
