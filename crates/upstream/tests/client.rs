//! End-to-end tests for `UpstreamClient` against an in-process HTTP service.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use upstream::{RetryConfig, UpstreamClient, UpstreamError};

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    input: String,
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, path: &str) -> UpstreamClient {
    UpstreamClient::new(
        "test",
        format!("http://{addr}{path}"),
        Some("secret-key".into()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn decodes_json_response_and_sends_bearer_token() {
    let router = Router::new().route(
        "/echo",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert_eq!(auth, "Bearer secret-key");
            Json(json!({ "input": body["input"] }))
        }),
    );
    let addr = spawn(router).await;

    let echo: Echo = client(addr, "/echo")
        .post_json(&json!({ "input": "seo tools" }))
        .await
        .unwrap();

    assert_eq!(echo.input, "seo tools");
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let router = Router::new().route(
        "/fail",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let addr = spawn(router).await;

    let err = client(addr, "/fail")
        .post_json::<_, Echo>(&json!({}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Status {
            status: 401,
            body: "invalid api key".into()
        }
    );
}

#[tokio::test]
async fn unexpected_shape_is_a_format_error() {
    let router = Router::new().route("/odd", post(|| async { Json(json!({ "other": 1 })) }));
    let addr = spawn(router).await;

    let err = client(addr, "/odd")
        .post_json::<_, Echo>(&json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Format(_)));
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/flaky",
            post(|State(calls): State<Arc<AtomicUsize>>| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                } else {
                    (StatusCode::OK, Json(json!({ "input": "ok" })))
                }
            }),
        )
        .with_state(calls.clone());
    let addr = spawn(router).await;

    let retry = RetryConfig::default()
        .with_max_retries(2)
        .with_base_delay(Duration::from_millis(1))
        .with_jitter(false);
    let echo: Echo = client(addr, "/flaky")
        .with_retry(Some(retry))
        .post_json(&json!({}))
        .await
        .unwrap();

    assert_eq!(echo.input, "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "/gone")
        .post_json::<_, Echo>(&json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Transport(_)));
}
