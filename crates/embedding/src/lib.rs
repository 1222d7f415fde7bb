//! Keyword embedding fetcher.
//!
//! Turns an ordered list of keywords into an equally long, equally ordered
//! list of embedding vectors by calling a remote embedding service once per
//! keyword.
//!
//! A keyword whose call fails (transport error, non-2xx, unexpected body) does
//! not abort the batch: it gets a zero vector of the configured dimension and
//! the rest of the batch carries on. Downstream, a zero vector never matches
//! anything, so the keyword ends up in a cluster of its own.
//!
//! ```no_run
//! use embedding::{fetch_embeddings, EmbeddingConfig, HttpEmbedder};
//!
//! # async fn run() -> Result<(), embedding::EmbeddingError> {
//! let cfg = EmbeddingConfig {
//!     api_key: Some("sk-...".into()),
//!     ..Default::default()
//! };
//! let embedder = HttpEmbedder::new(&cfg)?;
//! let keywords = vec!["seo tools".to_string(), "cheap flights".to_string()];
//! let batch = fetch_embeddings(&embedder, &keywords, cfg.dimension, 4).await;
//! assert_eq!(batch.embeddings.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;

use async_trait::async_trait;

pub use crate::config::EmbeddingConfig;
pub use crate::error::EmbeddingError;
pub use crate::fetch::{fetch_embeddings, zero_vector, EmbeddingBatch};
pub use crate::http::HttpEmbedder;
pub use upstream::{RetryConfig, UpstreamError};

/// Produces one embedding vector for one piece of text.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identifier, surfaced in logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
