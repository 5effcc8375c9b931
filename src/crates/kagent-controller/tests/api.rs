//! HTTP API tests against the full router with a scripted agent client

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kagent_client::{SseDecoder, SseEvent};
use kagent_controller::api::create_router;
use kagent_controller::db::DatabaseConnection;
use kagent_controller::testing::FakeAgentClient;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    agent: FakeAgentClient,
}

impl TestApp {
    async fn new() -> Self {
        let db = DatabaseConnection::in_memory_migrated().await.unwrap();
        let agent = FakeAgentClient::new();
        let router = create_router(db, Arc::new(agent.clone()));
        Self { router, agent }
    }

    async fn raw(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.raw(method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn create_session(&self, name: &str) -> Value {
        let (status, body) = self
            .post("/api/sessions?user_id=alice", json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

fn decode_events(bytes: &[u8]) -> Vec<SseEvent> {
    let mut decoder = SseDecoder::new();
    let mut events = decoder.push(bytes);
    events.extend(decoder.finish());
    events
}

#[tokio::test]
async fn test_health_and_version() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");

    let (status, body) = app.get("/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kagent_version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["git_commit"].is_string());
}

#[tokio::test]
async fn test_create_session_without_user_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/sessions", json!({ "name": "chat" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "user_id is required");

    let (status, _) = app
        .post("/api/sessions?user_id=", json!({ "name": "chat" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/sessions?user_id=alice").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_user_from_header_or_body() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sessions")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-User-Id", "bob")
        .body(Body::from(json!({ "name": "via-header" }).to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let (status, body) = app
        .post("/api/sessions", json!({ "name": "via-body", "user_id": "bob" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], "bob");

    let (_, body) = app.get("/api/sessions?user_id=bob").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_crud() {
    let app = TestApp::new().await;

    let session = app.create_session("triage").await;
    assert_eq!(session["name"], "triage");
    let id = session["id"].as_i64().unwrap();

    let (status, body) = app.get("/api/sessions/triage?user_id=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = app
        .put(
            &format!("/api/sessions/{id}?user_id=alice"),
            json!({ "name": "triage-2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "triage-2");
    assert_eq!(body["message"], "Session updated successfully");

    let (status, _) = app
        .put(&format!("/api/sessions/{id}?user_id=alice"), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.delete("/api/sessions/triage-2?user_id=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Session deleted successfully");

    let (status, _) = app.get(&format!("/api/sessions/{id}?user_id=alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generated_session_name() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/sessions?user_id=alice", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["name"].as_str().unwrap().starts_with("session-"));
}

#[tokio::test]
async fn test_missing_session_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/sessions/nope?user_id=alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert_eq!(body["code"], "NOT_FOUND");

    // sessions are scoped to their user
    app.create_session("private").await;
    let (status, _) = app.get("/api/sessions/private?user_id=mallory").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_session_name_conflicts() {
    let app = TestApp::new().await;
    app.create_session("dup").await;

    let (status, body) = app
        .post("/api/sessions?user_id=alice", json!({ "name": "dup" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DB_CONSTRAINT_VIOLATION");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sessions?user_id=alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], false);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn test_invoke_success_creates_one_complete_run() {
    let app = TestApp::new().await;
    app.create_session("work").await;

    let (status, body) = app
        .post("/api/sessions/work/invoke?user_id=alice", json!({ "task": "list pods" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["task_result"]["stop_reason"], "done");

    let (_, body) = app.get("/api/sessions/work/runs?user_id=alice").await;
    let runs = body["data"]["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["status"], "complete");
    assert_eq!(runs[0]["task"]["content"], "list pods");
    assert!(!runs[0]["team_result"].is_null());
    assert_eq!(runs[0]["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invoke_failure_creates_one_error_run() {
    let app = TestApp::new().await;
    app.create_session("work").await;
    app.agent.push_failure("framework unavailable");

    let (status, body) = app
        .post("/api/sessions/work/invoke?user_id=alice", json!({ "task": "list pods" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to invoke session"));

    let (_, body) = app.get("/api/runs?user_id=alice").await;
    let runs = body["data"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["status"], "error");
    assert!(runs[0]["error_message"]
        .as_str()
        .unwrap()
        .contains("framework unavailable"));

    let run_id = runs[0]["id"].as_i64().unwrap();
    let (status, body) = app.get(&format!("/api/runs/{run_id}?user_id=alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], run_id);
}

#[tokio::test]
async fn test_invoke_unknown_session_creates_no_run() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post("/api/sessions/ghost/invoke?user_id=alice", json!({ "task": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.agent.requests().is_empty());

    let (_, body) = app.get("/api/runs?user_id=alice").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_delete_session_cascades_runs() {
    let app = TestApp::new().await;
    app.create_session("short-lived").await;
    app.post(
        "/api/sessions/short-lived/invoke?user_id=alice",
        json!({ "task": "hi" }),
    )
    .await;

    let (_, body) = app.get("/api/runs?user_id=alice").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    app.delete("/api/sessions/short-lived?user_id=alice").await;

    let (status, _) = app.get("/api/sessions/short-lived/runs?user_id=alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get("/api/runs?user_id=alice").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_team_component_round_trip() {
    let app = TestApp::new().await;
    let component = json!({
        "provider": "autogen_agentchat.teams.RoundRobinGroupChat",
        "label": "k8s-team",
        "config": {
            "participants": [{"provider": "AssistantAgent", "config": {"name": "k8s", "tools": []}}],
            "termination_condition": {"provider": "TextMentionTermination", "config": {"text": "TERMINATE"}}
        }
    });

    let (status, body) = app
        .post("/api/teams?user_id=alice", json!({ "component": component }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["name"], "k8s-team");
    assert_eq!(body["data"]["version"], 1);

    let (status, body) = app.get("/api/teams/k8s-team?user_id=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["component"], component);

    let (_, body) = app
        .put(
            "/api/teams/k8s-team?user_id=alice",
            json!({ "component": {"provider": "SelectorGroupChat"} }),
        )
        .await;
    assert_eq!(body["data"]["version"], 2);
}

#[tokio::test]
async fn test_team_validation() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/teams?user_id=alice", json!({ "component": "not an object" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/teams?user_id=alice", json!({ "component": {} }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name is required");
}

#[tokio::test]
async fn test_invoke_passes_team_component() {
    let app = TestApp::new().await;
    let (_, team) = app
        .post(
            "/api/teams?user_id=alice",
            json!({ "name": "ops", "component": {"provider": "RoundRobinGroupChat"} }),
        )
        .await;
    let team_id = team["data"]["id"].as_i64().unwrap();
    app.post(
        "/api/sessions?user_id=alice",
        json!({ "name": "with-team", "team_id": team_id }),
    )
    .await;

    let (status, _) = app
        .post("/api/sessions/with-team/invoke?user_id=alice", json!({ "task": "go" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let requests = app.agent.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].team_config,
        Some(json!({"provider": "RoundRobinGroupChat"}))
    );
}

#[tokio::test]
async fn test_session_with_unknown_team_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post("/api/sessions?user_id=alice", json!({ "name": "s", "team_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tool_server_delete_cascades_tools() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/toolservers?user_id=alice",
            json!({ "name": "k8s", "component": {"url": "http://mcp:8084/sse"} }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let server_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            "/api/toolservers/k8s/tools?user_id=alice",
            json!({ "tools": [
                {"name": "get_pods", "component": {"label": "get_pods"}},
                {"name": "get_logs", "component": {"label": "get_logs"}}
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    app.post(
        "/api/tools?user_id=alice",
        json!({ "component": {"label": "standalone"} }),
    )
    .await;

    let (_, body) = app.get(&format!("/api/toolservers/{server_id}/tools?user_id=alice")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app.delete("/api/toolservers/k8s?user_id=alice").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/tools?user_id=alice").await;
    let tools = body["data"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "standalone");
}

#[tokio::test]
async fn test_tool_server_update_records_connection() {
    let app = TestApp::new().await;
    let (_, body) = app
        .post(
            "/api/toolservers?user_id=alice",
            json!({ "name": "fs", "component": {} }),
        )
        .await;
    assert!(body["data"]["last_connected"].is_null());

    let (status, body) = app.put("/api/toolservers/fs?user_id=alice", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["last_connected"].is_string());
}

#[tokio::test]
async fn test_tool_crud() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/tools?user_id=alice",
            json!({ "name": "search", "component": {"provider": "Search"} }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/tools/{id}?user_id=alice"),
            json!({ "component": {"provider": "Search", "config": {"top_k": 3}} }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["component"]["config"]["top_k"], 3);

    let (status, _) = app.get("/api/tools/abc?user_id=alice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&format!("/api/tools/{id}?user_id=alice")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/tools/{id}?user_id=alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_memory_crud() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/memories?user_id=alice",
            json!({
                "name": "docs",
                "provider": "pinecone",
                "api_key_secret_ref": "kagent/pinecone",
                "api_key_secret_key": "api-key",
                "memory_params": {"index_host": "https://docs.pinecone.io", "top_k": 5}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (_, body) = app.get("/api/memories/docs?user_id=alice").await;
    assert_eq!(body["data"]["memory_params"]["top_k"], 5);

    let (status, body) = app
        .put("/api/memories/docs?user_id=alice", json!({ "memory_params": {"top_k": 10} }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["memory_params"]["top_k"], 10);
    assert_eq!(body["data"]["provider"], "pinecone");

    let (status, _) = app
        .post("/api/memories?user_id=alice", json!({ "name": "x", "provider": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.delete("/api/memories/docs?user_id=alice").await;
    let (status, _) = app.get("/api/memories/docs?user_id=alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback() {
    let app = TestApp::new().await;
    app.create_session("rated").await;
    app.post("/api/sessions/rated/invoke?user_id=alice", json!({ "task": "hi" }))
        .await;
    let (_, body) = app.get("/api/sessions/rated/runs?user_id=alice").await;
    let message_id = body["data"]["runs"][0]["messages"][1]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/feedback?user_id=alice",
            json!({
                "message_id": message_id,
                "is_positive": false,
                "feedback_text": "picked the wrong namespace",
                "issue_type": "factual"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["issue_type"], "factual");

    let (status, _) = app
        .post(
            "/api/feedback?user_id=alice",
            json!({ "is_positive": true, "feedback_text": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/feedback?user_id=alice",
            json!({ "is_positive": true, "feedback_text": "ok", "issue_type": "vibes" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/feedback?user_id=alice").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invoke_stream_relays_events() {
    let app = TestApp::new().await;
    app.create_session("live").await;
    app.agent.push_stream(vec![
        SseEvent::new("TextMessage", "line one\nline two"),
        SseEvent::new("ToolCallRequestEvent", r#"{"name":"get_pods"}"#),
        SseEvent::new("TaskResult", r#"{"stop_reason":"done"}"#),
    ]);

    let (status, bytes) = app
        .raw(
            Method::POST,
            "/api/sessions/live/invoke/stream?user_id=alice",
            Some(json!({ "task": "watch" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let events = decode_events(&bytes);
    let types: Vec<&str> = events.iter().map(|e| e.event.as_str()).collect();
    assert_eq!(types, vec!["TextMessage", "ToolCallRequestEvent", "TaskResult"]);
    assert_eq!(events[0].data, "line one\nline two");
}

#[tokio::test]
async fn test_invoke_stream_open_failure() {
    let app = TestApp::new().await;
    app.create_session("live").await;
    app.agent.push_open_failure("connection refused");

    let (status, body) = app
        .post(
            "/api/sessions/live/invoke/stream?user_id=alice",
            json!({ "task": "watch" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], false);

    let (_, body) = app.get("/api/runs?user_id=alice").await;
    assert_eq!(body["data"][0]["status"], "error");
}
