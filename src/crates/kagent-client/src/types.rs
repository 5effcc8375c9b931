//! Wire types of the kagent controller API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub status: bool,
    /// Response payload
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub team_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user_id: String,
    pub session_id: Option<i64>,
    pub run_id: Option<i64>,
    pub config: Value,
    pub message_meta: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    pub user_id: String,
    pub session_id: i64,
    /// One of `created`, `active`, `complete`, `error`, `stopped`
    pub status: String,
    pub task: Value,
    pub team_result: Option<Value>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Present when listed through a session
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// `data` of `GET /api/sessions/:session/runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRuns {
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Value,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Value,
    pub server_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServer {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub component: Value,
    pub last_connected: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub provider: String,
    pub api_key_secret_ref: String,
    pub api_key_secret_key: String,
    pub memory_params: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: String,
    pub message_id: Option<i64>,
    pub is_positive: bool,
    pub feedback_text: String,
    pub issue_type: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// `data` of `GET /version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub kagent_version: String,
    pub git_commit: String,
    pub build_date: String,
}

/// `data` of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: String,
}

/// Messages and stop reason produced by a team run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// Result of a synchronous team invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeTaskResult {
    #[serde(default)]
    pub task_result: TaskResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Body of the invoke endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub task: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub component: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub component: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateToolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToolServerRequest {
    pub name: String,
    pub component: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateToolServerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Value>,
}

/// One tool reported by a tool server during refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredTool {
    pub name: String,
    pub component: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToolsRequest {
    pub tools: Vec<DiscoveredTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub api_key_secret_ref: String,
    #[serde(default)]
    pub api_key_secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_params: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMemoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_secret_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
    pub is_positive: bool,
    pub feedback_text: String,
    /// One of `instructions`, `factual`, `incomplete`, `tool`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}
