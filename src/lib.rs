//! Keyword clustering pipeline.
//!
//! One run takes a list of keywords and:
//!
//! 1. fetches an embedding per keyword ([`embedding`]), substituting a zero
//!    vector when a call fails,
//! 2. groups keywords greedily by cosine similarity to each group's seed
//!    ([`cluster`]),
//! 3. asks a chat model for a short label per group ([`labeler`]), falling
//!    back to the group's center keyword,
//! 4. optionally stores the labeled groups under a project ([`store`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use kwcluster::{ClusterPipeline, ClusterRequest, PipelineConfig};
//! use kwcluster::store::InMemoryStore;
//!
//! # async fn run() -> Result<(), kwcluster::PipelineError> {
//! let mut config = PipelineConfig::default();
//! config.embedding.api_key = Some("...".into());
//! config.labeler.api_key = Some("...".into());
//!
//! let pipeline = ClusterPipeline::from_config(config, Arc::new(InMemoryStore::new()))?;
//! let outcome = pipeline
//!     .run(ClusterRequest::new(["seo tools", "best seo software", "cheap flights"]))
//!     .await?;
//! for cluster in &outcome.clusters {
//!     println!("{}: {:?}", cluster.label, cluster.keywords);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use cluster;
pub use embedding;
pub use labeler;
pub use store;

pub use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_KEYWORDS, PipelineConfig};
pub use crate::error::PipelineError;
pub use crate::pipeline::{
    ClusterOutcome, ClusterPipeline, ClusterRequest, LabeledCluster, normalize_keywords,
};
