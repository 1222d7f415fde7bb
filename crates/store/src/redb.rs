//! Embedded store on top of redb.
//!
//! Records are JSON-encoded and keyed by
//! `<project_id>\0<run_id>\0<position>` so that listing a project is a
//! single range scan. redb transactions are blocking; every call runs on
//! the tokio blocking pool.
//!
//! ```yaml
//! store:
//!   backend: redb
//!   path: /data/kwcluster.redb
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::{sort_records, ClusterRecord, ClusterStore, StoreError};

const CLUSTERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kwcluster_clusters");

/// redb-backed [`ClusterStore`]. Cheap to clone; clones share the database.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

fn backend_err(err: impl std::fmt::Display) -> StoreError {
    StoreError::backend(err.to_string())
}

fn check_project_id(project_id: &str) -> Result<(), StoreError> {
    if project_id.contains('\0') {
        return Err(StoreError::backend("project id must not contain NUL"));
    }
    Ok(())
}

fn record_key(record: &ClusterRecord) -> String {
    format!(
        "{}\0{}\0{:010}",
        record.project_id, record.run_id, record.position
    )
}

impl RedbStore {
    /// Open or create the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(backend_err)?;

        let write_txn = db.begin_write().map_err(backend_err)?;
        {
            // Opening the table creates it.
            let _table = write_txn.open_table(CLUSTERS_TABLE).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn insert_blocking(db: &Database, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = db.begin_write().map_err(backend_err)?;
        {
            let mut table = write_txn.open_table(CLUSTERS_TABLE).map_err(backend_err)?;
            table.insert(key, value).map_err(backend_err)?;
        }
        write_txn.commit().map_err(backend_err)?;
        Ok(())
    }

    fn list_blocking(db: &Database, project_id: &str) -> Result<Vec<ClusterRecord>, StoreError> {
        let start = format!("{project_id}\0");
        let end = format!("{project_id}\u{1}");

        let read_txn = db.begin_read().map_err(backend_err)?;
        let table = read_txn.open_table(CLUSTERS_TABLE).map_err(backend_err)?;

        let mut records = Vec::new();
        for item in table
            .range(start.as_str()..end.as_str())
            .map_err(backend_err)?
        {
            let (_, value) = item.map_err(backend_err)?;
            records.push(serde_json::from_slice::<ClusterRecord>(value.value())?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ClusterStore for RedbStore {
    async fn insert(&self, record: &ClusterRecord) -> Result<(), StoreError> {
        check_project_id(&record.project_id)?;
        let key = record_key(record);
        let value = serde_json::to_vec(record)?;
        let db = Arc::clone(&self.db);

        tokio::task::spawn_blocking(move || Self::insert_blocking(&db, &key, &value))
            .await
            .map_err(backend_err)?
    }

    async fn list(&self, project_id: &str) -> Result<Vec<ClusterRecord>, StoreError> {
        check_project_id(project_id)?;
        let project_id = project_id.to_string();
        let db = Arc::clone(&self.db);

        let mut records =
            tokio::task::spawn_blocking(move || Self::list_blocking(&db, &project_id))
                .await
                .map_err(backend_err)??;
        sort_records(&mut records);
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}
