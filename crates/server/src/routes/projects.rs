use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use store::ClusterRecord;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectClustersResponse {
    pub project_id: String,
    pub clusters: Vec<ClusterRecord>,
    pub total: usize,
}

/// GET /api/v1/projects/{project_id}/clusters
pub async fn list_project_clusters(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
) -> ServerResult<Json<ProjectClustersResponse>> {
    let project_id = project_id.trim().to_string();
    if project_id.is_empty() {
        return Err(ServerError::BadRequest("project id is empty".into()));
    }

    let clusters = state.pipeline.store().list(&project_id).await?;
    Ok(Json(ProjectClustersResponse {
        total: clusters.len(),
        project_id,
        clusters,
    }))
}
