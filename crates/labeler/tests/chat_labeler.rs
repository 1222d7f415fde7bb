//! `ChatLabeler` against an in-process stand-in for the chat service.

use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use cluster::KeywordCluster;
use labeler::{label_clusters, ChatLabeler, LabelError, Labeler, LabelerConfig, UpstreamError};
use serde_json::{json, Value};

/// Answers based on the first keyword in the user prompt:
/// "fail" -> 502, "nochoice" -> empty choices, "blank" -> whitespace content,
/// anything else -> a quoted label with a trailing period.
async fn fake_chat(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer label-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["max_tokens"], 20);

    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    let first = prompt
        .rsplit(": ")
        .next()
        .and_then(|list| list.split(", ").next())
        .unwrap_or_default()
        .to_string();

    match first.as_str() {
        "fail" => (StatusCode::BAD_GATEWAY, Json(json!({"error": "upstream"}))),
        "nochoice" => (StatusCode::OK, Json(json!({"choices": []}))),
        "blank" => (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"content": "   "}}]})),
        ),
        other => (
            StatusCode::OK,
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": format!("\"{other} Topics.\"")}}]
            })),
        ),
    }
}

async fn spawn_service() -> SocketAddr {
    let router = Router::new().route("/v1/chat/completions", post(fake_chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> LabelerConfig {
    LabelerConfig {
        api_url: format!("http://{addr}/v1/chat/completions"),
        api_key: Some("label-key".into()),
        retry: None,
        ..Default::default()
    }
}

fn keywords(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn cleans_the_returned_label() {
    let addr = spawn_service().await;
    let labeler = ChatLabeler::new(&config(addr)).unwrap();

    let label = labeler.label(&keywords(&["seo", "seo tools"])).await.unwrap();

    assert_eq!(label, "seo Topics");
}

#[tokio::test]
async fn error_shapes_map_to_label_errors() {
    let addr = spawn_service().await;
    let labeler = ChatLabeler::new(&config(addr)).unwrap();

    let err = labeler.label(&keywords(&["fail"])).await.unwrap_err();
    assert!(matches!(
        err,
        LabelError::Upstream(UpstreamError::Status { status: 502, .. })
    ));

    let err = labeler.label(&keywords(&["nochoice"])).await.unwrap_err();
    assert!(matches!(err, LabelError::Upstream(UpstreamError::Format(_))));

    let err = labeler.label(&keywords(&["blank"])).await.unwrap_err();
    assert!(matches!(err, LabelError::EmptyLabel));
}

#[tokio::test]
async fn wrong_key_is_a_status_error() {
    let addr = spawn_service().await;
    let cfg = LabelerConfig {
        api_key: Some("other".into()),
        ..config(addr)
    };
    let labeler = ChatLabeler::new(&cfg).unwrap();

    let err = labeler.label(&keywords(&["seo"])).await.unwrap_err();

    assert!(matches!(
        err,
        LabelError::Upstream(UpstreamError::Status { status: 401, .. })
    ));
}

#[tokio::test]
async fn batch_falls_back_to_center_keyword() {
    let addr = spawn_service().await;
    let labeler = ChatLabeler::new(&config(addr)).unwrap();
    let clusters = vec![
        KeywordCluster {
            center: "travel".into(),
            keywords: keywords(&["travel", "trips"]),
        },
        KeywordCluster {
            center: "fail".into(),
            keywords: keywords(&["fail", "also fail"]),
        },
    ];

    let batch = label_clusters(&labeler, &clusters, 2).await;

    assert_eq!(batch.labels, vec!["travel Topics", "fail"]);
    assert_eq!(batch.fallback_indices, vec![1]);
}
