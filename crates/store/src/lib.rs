//! Persistence for labeled keyword clusters.
//!
//! Records are written one at a time through the [`ClusterStore`] trait.
//! Three backends ship with the crate:
//!
//! - [`InMemoryStore`]: process-local, for tests and single-node dev runs.
//! - [`RedbStore`]: embedded, crash-safe file store (feature `backend-redb`).
//! - [`RestStore`]: PostgREST-compatible relational table over HTTP.
//!
//! Pick one at runtime with [`StoreConfig::build`].

pub mod config;
pub mod error;
pub mod memory;
pub mod record;
#[cfg(feature = "backend-redb")]
pub mod redb;
pub mod rest;

use async_trait::async_trait;

pub use crate::config::StoreConfig;
pub use crate::error::StoreError;
pub use crate::memory::InMemoryStore;
pub use crate::record::{sort_records, ClusterRecord};
#[cfg(feature = "backend-redb")]
pub use crate::redb::RedbStore;
pub use crate::rest::RestStore;

/// A sink for cluster records, keyed by project.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Persist one record. Records are independent; there is no run-level
    /// transaction.
    async fn insert(&self, record: &ClusterRecord) -> Result<(), StoreError>;

    /// All records for `project_id`, ordered by creation time, run and
    /// position within the run.
    async fn list(&self, project_id: &str) -> Result<Vec<ClusterRecord>, StoreError>;

    /// Short backend name for logs and readiness output.
    fn name(&self) -> &'static str;
}
