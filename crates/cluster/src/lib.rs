//! Keyword clustering by embedding similarity.
//!
//! The algorithm is a greedy, single-pass, single-link grouping:
//!
//! 1. Walk keywords in input order, skipping ones already assigned.
//! 2. The first unassigned keyword seeds a new cluster and becomes its center.
//! 3. Every later unassigned keyword whose cosine similarity to the **seed**
//!    is `>= threshold` joins the cluster.
//!
//! It is O(n²·d) and order sensitive: feeding the same keywords in another
//! order can produce another partition. For a fixed order and fixed vectors
//! the result is fully deterministic.
//!
//! ```
//! use cluster::{cluster_keywords, DEFAULT_SIMILARITY_THRESHOLD};
//!
//! let keywords = vec!["seo tools".to_string(), "seo software".to_string(), "flights".to_string()];
//! let embeddings = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
//!
//! let clusters = cluster_keywords(&keywords, &embeddings, DEFAULT_SIMILARITY_THRESHOLD).unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].center, "seo tools");
//! ```

pub mod error;
pub mod greedy;
pub mod similarity;

pub use crate::error::ClusterError;
pub use crate::greedy::{cluster_keywords, KeywordCluster};
pub use crate::similarity::cosine_similarity;

/// Minimum cosine similarity for a keyword to join a cluster's seed.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;
