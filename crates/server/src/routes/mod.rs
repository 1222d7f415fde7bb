//! API route handlers
//!
//! - `health`: liveness, readiness and metrics
//! - `cluster`: running the clustering pipeline
//! - `projects`: reading persisted clusters back

pub mod cluster;
pub mod health;
pub mod projects;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /, no authentication).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "kwcluster",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/keywords/cluster",
            "/api/v1/projects/{project_id}/clusters",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
