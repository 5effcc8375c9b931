// Tests for the kagent REST client against a local stub server

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use kagent_client::types::CreateSessionRequest;
use kagent_client::{ClientConfig, ClientError, KagentClient, SseEvent};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Deserialize)]
struct UserQuery {
    user_id: Option<String>,
}

fn session_json(id: i64, user: &str, name: &str) -> Value {
    json!({
        "id": id,
        "user_id": user,
        "name": name,
        "team_id": null,
        "created_at": "2026-01-01T00:00:00.000000Z",
        "updated_at": "2026-01-01T00:00:00.000000Z"
    })
}

async fn list_sessions(Query(q): Query<UserQuery>) -> impl IntoResponse {
    match q.user_id {
        Some(user) => (
            StatusCode::OK,
            Json(json!({"status": true, "data": [session_json(1, &user, "first")]})),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": false, "message": "user_id is required"})),
        ),
    }
}

async fn create_session(
    Query(q): Query<UserQuery>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let user = q.user_id.unwrap_or_default();
    let name = body["name"].as_str().unwrap_or("generated").to_string();
    (
        StatusCode::CREATED,
        Json(json!({
            "status": true,
            "data": session_json(7, &user, &name),
            "message": "Session created successfully"
        })),
    )
}

async fn get_session(Path(session): Path<String>) -> impl IntoResponse {
    if session == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": false, "message": "Session not found", "error": "NotFound"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"status": true, "data": session_json(3, "alice", &session)})),
    )
}

async fn stream_session() -> impl IntoResponse {
    let body = [
        SseEvent::new("TextMessage", r#"{"content":"hi"}"#).to_wire(),
        ": keep-alive\n\n".to_string(),
        SseEvent::new("TaskResult", r#"{"stop_reason":"done"}"#).to_wire(),
    ]
    .concat();
    ([(header::CONTENT_TYPE, "text/event-stream")], body)
}

async fn version(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    // version is not user scoped
    assert!(!q.contains_key("user_id"));
    Json(json!({
        "status": true,
        "data": {"kagent_version": "0.1.0", "git_commit": "abc123", "build_date": "today"}
    }))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/version", get(version))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:session", get(get_session))
        .route("/api/sessions/:session/invoke/stream", post(stream_session));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[test]
fn test_client_config_default_values() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8083");
    assert_eq!(config.timeout_seconds, 30);
    assert!(config.user_id.is_none());
}

#[test]
fn test_client_config_chaining() {
    let config = ClientConfig::new("http://kagent:8083/")
        .with_user_id("bob")
        .with_timeout(5);

    assert_eq!(config.base_url, "http://kagent:8083");
    assert_eq!(config.user_id.as_deref(), Some("bob"));
    assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_client_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("client.toml");

    let config = ClientConfig::new("http://kagent:9000").with_user_id("carol");
    config.save_to_file(&path).await.unwrap();

    let loaded = ClientConfig::from_file(&path).await.unwrap();
    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_list_sends_default_user() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let sessions = client.sessions().list(None).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].user_id, "alice");
}

#[tokio::test]
async fn test_explicit_user_overrides_default() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let sessions = client.sessions().list(Some("dave")).await.unwrap();
    assert_eq!(sessions[0].user_id, "dave");
}

#[tokio::test]
async fn test_missing_user_never_sends_request() {
    let client = KagentClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();

    let err = client.sessions().list(None).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingUserId));
    assert_eq!(err.to_string(), "userID is required");
}

#[tokio::test]
async fn test_create_unwraps_envelope() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let request = CreateSessionRequest {
        name: Some("demo".to_string()),
        team_id: None,
    };
    let session = client.sessions().create(&request, None).await.unwrap();
    assert_eq!(session.id, 7);
    assert_eq!(session.name, "demo");
}

#[tokio::test]
async fn test_not_found_maps_to_api_error() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let err = client.sessions().get("missing", None).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Api { message, .. } => assert_eq!(message, "Session not found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invoke_stream_decodes_events() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let stream = client
        .sessions()
        .invoke_stream("demo", "say hi", None)
        .await
        .unwrap();
    let events: Vec<SseEvent> = stream.map(|e| e.unwrap()).collect().await;

    assert_eq!(
        events,
        vec![
            SseEvent::new("TextMessage", r#"{"content":"hi"}"#),
            SseEvent::new("TaskResult", r#"{"stop_reason":"done"}"#),
        ]
    );
}

#[tokio::test]
async fn test_version_is_not_user_scoped() {
    let base = spawn_stub().await;
    let client = KagentClient::for_user(base, "alice").unwrap();

    let info = client.version().await.unwrap();
    assert_eq!(info.git_commit, "abc123");
}
