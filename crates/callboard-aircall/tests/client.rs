//! Drives `AircallClient` against a local stub of the Aircall API.

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use callboard_aircall::{AircallClient, AircallError, CallSource};
use callboard_core::AircallConfig;
use callboard_models::{ArtifactKind, CallArtifacts};

const TIMEOUT: Duration = Duration::from_secs(5);

// "api-id:api-token"
const EXPECTED_AUTH: &str = "Basic YXBpLWlkOmFwaS10b2tlbg==";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == EXPECTED_AUTH)
}

async fn ping(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        (StatusCode::OK, Json(json!({"ping": "pong"})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
    }
}

async fn calls(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("order").map(String::as_str) != Some("desc") || !params.contains_key("from") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad query"})));
    }
    let per_page: usize = params
        .get("per_page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);
    let calls: Vec<_> = (0..5u64)
        .take(per_page)
        .map(|i| {
            json!({
                "id": 1000 - i,
                "direction": "inbound",
                "status": "done",
                "raw_digits": "+33 6 12 34 56 78",
                "started_at": 1_700_000_000 - i as i64 * 60
            })
        })
        .collect();
    (
        StatusCode::OK,
        Json(json!({"calls": calls, "meta": {"count": calls.len()}})),
    )
}

async fn call(Path(id): Path<u64>) -> impl IntoResponse {
    if id != 1000 {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"})));
    }
    (
        StatusCode::OK,
        Json(json!({"call": {
            "id": 1000,
            "direction": "outbound",
            "status": "done",
            "raw_digits": "+33 6 12 34 56 78",
            "duration": 95
        }})),
    )
}

async fn artifact(Path((id, kind)): Path<(u64, String)>) -> impl IntoResponse {
    match (id, kind.as_str()) {
        (1000, "summary") => (
            StatusCode::OK,
            Json(json!({"summary": {"id": 1, "content": "Client intéressé par la visite"}})),
        ),
        (1000, "action_items") => (
            StatusCode::OK,
            Json(json!({"action_items": [{"content": "Envoyer l'offre", "ai_generated": true}]})),
        ),
        (1000, "topics") => (StatusCode::OK, Json(json!({"topic": null}))),
        (_, "transcription") if id == 500 => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/calls", get(calls))
        .route("/v1/calls/:id", get(call))
        .route("/v1/calls/:id/:kind", get(artifact));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn client(base_url: String, token: &str) -> AircallClient {
    AircallClient::new(&AircallConfig {
        api_id: "api-id".to_string(),
        api_token: token.to_string(),
        base_url,
    })
    .unwrap()
}

#[tokio::test]
async fn test_ping_uses_basic_auth() {
    let base = spawn_stub().await;

    client(base.clone(), "api-token").ping(TIMEOUT).await.unwrap();

    let err = client(base, "wrong").ping(TIMEOUT).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_recent_calls_sends_query() {
    let base = spawn_stub().await;
    let since = chrono::DateTime::from_timestamp(1_699_990_000, 0).unwrap();

    let calls = client(base, "api-token")
        .recent_calls(Some(since), 3, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].id, 1000);
    assert_eq!(calls[0].raw_digits(), "+33 6 12 34 56 78");
}

#[tokio::test]
async fn test_call_by_id() {
    let client = client(spawn_stub().await, "api-token");

    let call = client.call(1000, TIMEOUT).await.unwrap().unwrap();
    assert_eq!(call.id, 1000);
    assert_eq!(call.duration_secs(), 95);

    assert!(client.call(42, TIMEOUT).await.unwrap().is_none());
}

#[tokio::test]
async fn test_artifacts() {
    let base = spawn_stub().await;
    let client = client(base, "api-token");

    let mut artifacts = CallArtifacts::default();
    for kind in ArtifactKind::ALL {
        if let Some(payload) = client.artifact(1000, kind, TIMEOUT).await.unwrap() {
            artifacts.insert(kind, payload);
        }
    }

    assert!(artifacts.transcription.is_none());
    assert!(artifacts.sentiment.is_none());
    assert!(artifacts.topics.is_none());
    assert_eq!(
        artifacts.summary.unwrap().content.as_deref(),
        Some("Client intéressé par la visite")
    );
    assert_eq!(artifacts.action_items.unwrap().items().len(), 1);
}

#[tokio::test]
async fn test_artifact_not_found_is_none() {
    let base = spawn_stub().await;
    let result = client(base, "api-token")
        .artifact(42, ArtifactKind::Summary, TIMEOUT)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_artifact_server_error_is_reported() {
    let base = spawn_stub().await;
    let err = client(base, "api-token")
        .artifact(500, ArtifactKind::Transcription, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, AircallError::Status { status: 500, .. }));
}
