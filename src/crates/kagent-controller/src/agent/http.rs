//! HTTP implementation of [`AgentClient`]

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use kagent_client::sse::decode_stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{AgentClient, AgentClientError, AgentEventStream, InvokeTaskRequest, InvokeTaskResult};

/// Envelope used by the agent framework's HTTP API
#[derive(Debug, Deserialize)]
struct FrameworkResponse<T> {
    #[serde(default = "default_status")]
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

fn default_status() -> bool {
    true
}

/// Talks to the agent framework over HTTP
///
/// POSTs `{task, team_config}` to `{base}/invoke` and `{base}/invoke/stream`.
/// The configured timeout is the only one applied to invocations.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AgentClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AgentClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("detail"))
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str().map(str::to_string))
            })
            .unwrap_or(body);

        Err(AgentClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, AgentClientError> {
        let envelope: FrameworkResponse<T> = serde_json::from_str(body)
            .map_err(|e| AgentClientError::InvalidResponse(e.to_string()))?;

        if !envelope.status {
            return Err(AgentClientError::Failed(
                envelope
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| AgentClientError::InvalidResponse("response has no data".to_string()))
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn invoke_task(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<InvokeTaskResult, AgentClientError> {
        let url = self.url("invoke");
        tracing::debug!(%url, "invoking team");

        let response = self.http.post(&url).json(&request).send().await?;
        let body = Self::check(response).await?.text().await?;
        Self::unwrap_envelope(&body)
    }

    async fn invoke_task_stream(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<AgentEventStream, AgentClientError> {
        let url = self.url("invoke/stream");
        tracing::debug!(%url, "opening team event stream");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let events = decode_stream(response.bytes_stream())
            .map(|r| r.map_err(|e| AgentClientError::Stream(e.to_string())));
        Ok(Box::pin(events))
    }
}
