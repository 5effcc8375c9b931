//! The REST client driven against a live controller

use std::sync::Arc;

use futures::StreamExt;
use kagent_client::types::{
    CreateFeedbackRequest, CreateSessionRequest, CreateTeamRequest, CreateToolServerRequest,
    DiscoveredTool, UpdateTeamRequest,
};
use kagent_client::{ClientConfig, ClientError, KagentClient};
use kagent_controller::api::create_router;
use kagent_controller::db::DatabaseConnection;
use kagent_controller::testing::FakeAgentClient;
use serde_json::json;
use std::time::Duration;

async fn serve(agent: FakeAgentClient) -> String {
    let db = DatabaseConnection::in_memory_migrated().await.unwrap();
    let app = create_router(db, Arc::new(agent));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

async fn start() -> (KagentClient, FakeAgentClient) {
    let agent = FakeAgentClient::new();
    let base = serve(agent.clone()).await;
    let config = ClientConfig::new(base).with_user_id("alice");
    (KagentClient::new(config).unwrap(), agent)
}

#[tokio::test]
async fn test_health_and_version() {
    let (client, _) = start().await;

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.database, "connected");

    let version = client.version().await.unwrap();
    assert_eq!(version.kagent_version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_session_lifecycle_with_invoke() {
    let (client, agent) = start().await;

    let team = client
        .teams()
        .create(
            &CreateTeamRequest {
                name: None,
                component: json!({"label": "helper", "provider": "RoundRobinGroupChat"}),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(team.name, "helper");

    let session = client
        .sessions()
        .create(
            &CreateSessionRequest {
                name: Some("chat one".to_string()),
                team_id: Some(team.id),
            },
            None,
        )
        .await
        .unwrap();

    let result = client
        .sessions()
        .invoke("chat one", "what is running?", None)
        .await
        .unwrap();
    assert_eq!(result.task_result.stop_reason.as_deref(), Some("done"));
    assert_eq!(
        agent.requests()[0].team_config.as_ref().unwrap()["label"],
        "helper"
    );

    let runs = client
        .sessions()
        .list_runs(&session.id.to_string(), None)
        .await
        .unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "complete");
    assert_eq!(runs[0].messages.len(), 2);

    let run = client.runs().get(runs[0].id, None).await.unwrap();
    assert_eq!(run.session_id, session.id);

    client.sessions().delete("chat one", None).await.unwrap();
    let err = client.sessions().get("chat one", None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invoke_failure_surfaces_api_error() {
    let (client, agent) = start().await;
    client
        .sessions()
        .create(&CreateSessionRequest { name: Some("s".into()), team_id: None }, None)
        .await
        .unwrap();
    agent.push_failure("no model configured");

    let err = client.sessions().invoke("s", "hi", None).await.unwrap_err();
    match err {
        ClientError::Api { status, message, .. } => {
            assert_eq!(status, 500);
            assert!(message.contains("no model configured"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let runs = client.runs().list(None).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "error");
}

#[tokio::test]
async fn test_invoke_stream_through_client() {
    let (client, _) = start().await;
    client
        .sessions()
        .create(&CreateSessionRequest { name: Some("live".into()), team_id: None }, None)
        .await
        .unwrap();

    let stream = client
        .sessions()
        .invoke_stream("live", "ping", None)
        .await
        .unwrap();
    let events: Vec<_> = stream.map(|e| e.unwrap()).collect().await;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "TextMessage");
    assert_eq!(events[0].json_data().unwrap()["content"], "echo: ping");
    assert_eq!(events[1].event, "TaskResult");
}

#[tokio::test]
async fn test_team_update_bumps_version() {
    let (client, _) = start().await;
    let team = client
        .teams()
        .create(
            &CreateTeamRequest {
                name: Some("ops".into()),
                component: json!({"provider": "SelectorGroupChat"}),
            },
            None,
        )
        .await
        .unwrap();

    let updated = client
        .teams()
        .update(
            "ops",
            &UpdateTeamRequest {
                name: None,
                component: Some(json!({"provider": "RoundRobinGroupChat"})),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.id, team.id);
    assert_eq!(updated.version, team.version + 1);
}

#[tokio::test]
async fn test_tool_server_refresh_and_feedback() {
    let (client, _) = start().await;
    client
        .tool_servers()
        .create(
            &CreateToolServerRequest {
                name: "kube".into(),
                component: json!({"url": "http://kube-mcp/sse"}),
            },
            None,
        )
        .await
        .unwrap();

    let tools = client
        .tool_servers()
        .refresh_tools(
            "kube",
            vec![DiscoveredTool { name: "get_pods".into(), component: json!({}) }],
            None,
        )
        .await
        .unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(client.tools().list(None).await.unwrap().len(), 1);

    client.tool_servers().delete("kube", None).await.unwrap();
    assert!(client.tools().list(None).await.unwrap().is_empty());

    let feedback = client
        .feedback()
        .create(
            &CreateFeedbackRequest {
                message_id: None,
                is_positive: true,
                feedback_text: "fast and correct".into(),
                issue_type: None,
            },
            None,
        )
        .await
        .unwrap();
    assert!(feedback.is_positive);

    // another user sees nothing
    assert!(client.feedback().list(Some("bob")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invoke_completes_after_client_times_out() {
    let agent = FakeAgentClient::new();
    agent.with_delay(Duration::from_millis(800));
    let base = serve(agent.clone()).await;
    let client = KagentClient::new(ClientConfig::new(base.clone()).with_user_id("alice")).unwrap();
    client
        .sessions()
        .create(&CreateSessionRequest { name: Some("slow".into()), team_id: None }, None)
        .await
        .unwrap();

    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let sent = impatient
        .post(format!("{}api/sessions/slow/invoke?user_id=alice", base))
        .json(&json!({"task": "take your time"}))
        .send()
        .await;
    assert!(sent.is_err());

    let mut runs = Vec::new();
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        runs = client.runs().list(None).await.unwrap();
        if runs.iter().all(|r| r.status == "complete") {
            break;
        }
    }
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "complete");
    assert!(runs[0].team_result.is_some());
    assert!(runs[0].error_message.is_none());
}
