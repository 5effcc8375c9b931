//! Client side of the external agent-execution framework
//!
//! The controller never runs agents itself: it hands a task plus the team's
//! component configuration to the framework and relays what comes back.
//! [`AgentClient`] is the seam; [`HttpAgentClient`] is the production
//! implementation and `testing::FakeAgentClient` a scripted stand-in.

pub mod http;

use async_trait::async_trait;
use kagent_client::sse::SseStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use http::HttpAgentClient;
pub use kagent_client::types::{InvokeTaskResult, TaskResult};

/// Errors from the agent framework
#[derive(Debug, Error)]
pub enum AgentClientError {
    /// Transport failure, including timeouts
    #[error("agent request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("agent returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The framework answered but reported failure
    #[error("agent reported failure: {0}")]
    Failed(String),

    /// Body could not be understood
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),

    /// The event stream broke mid-way
    #[error("agent stream error: {0}")]
    Stream(String),
}

/// Request body for both invoke endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeTaskRequest {
    pub task: String,
    /// Team component; `None` when the session has no team
    pub team_config: Option<Value>,
}

/// Events relayed from a streaming invocation
pub type AgentEventStream = SseStream<AgentClientError>;

#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Run a task to completion
    async fn invoke_task(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<InvokeTaskResult, AgentClientError>;

    /// Start a task and return its event stream
    ///
    /// Dropping the stream abandons the upstream request.
    async fn invoke_task_stream(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<AgentEventStream, AgentClientError>;
}
