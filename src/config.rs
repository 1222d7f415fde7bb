//! Pipeline configuration.
//!
//! Everything the pipeline needs is passed in explicitly through
//! [`PipelineConfig`]; nothing is read from the process environment here.
//! The server layers files and `KWCLUSTER__*` variables on top of these
//! defaults.
//!
//! ```yaml
//! pipeline:
//!   similarity_threshold: 0.75
//!   max_keywords: 500
//!   concurrency: 4
//!   embedding:
//!     api_key: "..."
//!     model: "text-embedding-004"
//!     dimension: 768
//!   labeler:
//!     api_key: "..."
//!     model: "gemini-2.0-flash"
//! ```

use cluster::DEFAULT_SIMILARITY_THRESHOLD;
use embedding::EmbeddingConfig;
use labeler::LabelerConfig;
use serde::{Deserialize, Serialize};

use crate::PipelineError;

pub const DEFAULT_MAX_KEYWORDS: usize = 500;
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub embedding: EmbeddingConfig,
    pub labeler: LabelerConfig,
    /// Minimum cosine similarity to a cluster's seed for a keyword to join.
    pub similarity_threshold: f32,
    /// Largest accepted keyword list after de-duplication.
    pub max_keywords: usize,
    /// Remote calls in flight per stage. `1` issues them one at a time.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            labeler: LabelerConfig::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    /// Both remote services need a non-blank API key.
    pub fn ensure_credentials(&self) -> Result<(), PipelineError> {
        if !self.embedding.has_credentials() {
            return Err(PipelineError::MissingCredentials("embedding"));
        }
        if !self.labeler.has_credentials() {
            return Err(PipelineError::MissingCredentials("labeler"));
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with. Credentials are checked
    /// separately, per run.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.concurrency == 0 {
            return Err(PipelineError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.max_keywords == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_keywords must be at least 1".into(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(PipelineError::InvalidConfig(
                "embedding.dimension must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
