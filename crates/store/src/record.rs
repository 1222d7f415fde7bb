use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted cluster. Field names match the relational table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub id: Uuid,
    /// Shared by every cluster produced by the same pipeline run.
    pub run_id: Uuid,
    pub project_id: String,
    /// Index of the cluster within its run.
    pub position: u32,
    pub name: String,
    pub label: String,
    pub keywords: Vec<String>,
    pub center_keyword: String,
    pub created_at: DateTime<Utc>,
}

impl ClusterRecord {
    pub fn new(
        run_id: Uuid,
        project_id: impl Into<String>,
        position: u32,
        label: impl Into<String>,
        keywords: Vec<String>,
        center_keyword: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let label = label.into();
        Self {
            id: Uuid::new_v4(),
            run_id,
            project_id: project_id.into(),
            position,
            name: label.clone(),
            label,
            keywords,
            center_keyword: center_keyword.into(),
            created_at,
        }
    }
}

/// Order records the way [`crate::ClusterStore::list`] promises.
pub fn sort_records(records: &mut [ClusterRecord]) {
    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.run_id.cmp(&b.run_id))
            .then_with(|| a.position.cmp(&b.position))
    });
}

/// Records of one run share `created_at`, as the pipeline writes them.
#[cfg(test)]
pub(crate) fn sample(project_id: &str, run_id: Uuid, position: u32) -> ClusterRecord {
    ClusterRecord::new(
        run_id,
        project_id,
        position,
        format!("label {position}"),
        vec![format!("kw {position}"), format!("kw {position} extra")],
        format!("kw {position}"),
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    )
}
