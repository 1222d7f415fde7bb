//! Cluster labeler.
//!
//! Asks a chat-completion service for a short (2-4 word) label per keyword
//! cluster. A failed call never leaves a cluster unlabeled: the cluster's
//! center keyword is used instead.

pub mod chat;
pub mod config;
pub mod error;
pub mod label;

use async_trait::async_trait;

pub use crate::chat::ChatLabeler;
pub use crate::config::LabelerConfig;
pub use crate::error::LabelError;
pub use crate::label::{clean_label, label_clusters, LabelBatch};
pub use upstream::{RetryConfig, UpstreamError};

/// Produces a short descriptive label for a group of keywords.
#[async_trait]
pub trait Labeler: Send + Sync {
    async fn label(&self, keywords: &[String]) -> Result<String, LabelError>;

    fn model_name(&self) -> &str {
        "unknown"
    }
}
