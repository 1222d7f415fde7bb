use cluster::ClusterError;
use embedding::EmbeddingError;
use labeler::LabelError;
use thiserror::Error;

/// Errors that end a pipeline run without a result.
///
/// Per-keyword embedding failures, per-cluster labeling failures and
/// persistence failures are not here: the pipeline degrades around them.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// No non-blank keyword was supplied.
    #[error("No keywords provided.")]
    NoKeywords,
    #[error("too many keywords: got {count}, the limit is {max}")]
    TooManyKeywords { count: usize, max: usize },
    /// An API key for a remote service is absent or blank.
    #[error("missing credentials for the {0} service")]
    MissingCredentials(&'static str),
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
    #[error("embedding client setup failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("labeler client setup failed: {0}")]
    Labeler(#[from] LabelError),
    #[error("clustering failed: {0}")]
    Cluster(#[from] ClusterError),
}

impl PipelineError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoKeywords | Self::TooManyKeywords { .. })
    }
}
