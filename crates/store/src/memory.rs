use std::sync::RwLock;

use async_trait::async_trait;

use crate::{sort_records, ClusterRecord, ClusterStore, StoreError};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<ClusterRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ClusterStore for InMemoryStore {
    async fn insert(&self, record: &ClusterRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .push(record.clone());
        Ok(())
    }

    async fn list(&self, project_id: &str) -> Result<Vec<ClusterRecord>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        let mut records: Vec<ClusterRecord> = guard
            .iter()
            .filter(|record| record.project_id == project_id)
            .cloned()
            .collect();
        drop(guard);

        sort_records(&mut records);
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}
