use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kwcluster::{ClusterOutcome, ClusterRequest, LabeledCluster};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// Response from a clustering run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResponse {
    pub success: bool,
    pub run_id: Uuid,
    pub clusters: Vec<LabeledCluster>,
    pub total_clusters: usize,
    /// Present only when a project id was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_failures: Option<usize>,
}

impl From<ClusterOutcome> for ClusterResponse {
    fn from(outcome: ClusterOutcome) -> Self {
        Self {
            success: true,
            run_id: outcome.run_id,
            total_clusters: outcome.clusters.len(),
            clusters: outcome.clusters,
            persisted: outcome.persisted,
            persist_failures: outcome.persisted.map(|_| outcome.persist_failures),
        }
    }
}

/// POST /api/v1/keywords/cluster
///
/// The run is spawned so a request timeout or client disconnect does not
/// cancel it halfway through persistence; the finished run is still logged
/// with its `run_id` and persisted count.
pub async fn cluster_keywords(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ClusterRequest>, JsonRejection>,
) -> ServerResult<Json<ClusterResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(state.config.max_body_size_mb)
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    })?;

    let pipeline = Arc::clone(&state.pipeline);
    let outcome = tokio::spawn(async move { pipeline.run(request).await })
        .await
        .map_err(|err| ServerError::Internal(format!("cluster run aborted: {err}")))??;
    Ok(Json(outcome.into()))
}
