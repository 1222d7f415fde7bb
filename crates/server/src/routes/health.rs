use std::sync::Arc;
use std::time::SystemTime;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::{ServerMetadata, ServerState};

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Liveness: 200 while the process is serving.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "kwcluster-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness: 503 until both remote services have credentials, since every
/// clustering request would fail before then.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> Response {
    let pipeline = &state.pipeline;
    let (status, readiness, credentials) = match pipeline.config().ensure_credentials() {
        Ok(()) => (StatusCode::OK, "ready", "configured".to_string()),
        Err(err) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready", err.to_string()),
    };

    let body = Json(json!({
        "status": readiness,
        "service": "kwcluster-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "store": pipeline.store().name(),
            "credentials": credentials,
        }
    }));

    (status, body).into_response()
}

/// Prometheus text when a recorder is installed, JSON uptime otherwise.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => Json(ServerMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime_seconds(),
        })
        .into_response(),
    }
}
