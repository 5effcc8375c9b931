//! Scripted agent client for tests
//!
//! [`FakeAgentClient`] answers invocations from a queue of scripted
//! responses and records every request it receives. When the queue is
//! empty it echoes the task back.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use kagent_client::SseEvent;
use parking_lot::Mutex;
use serde_json::json;

use crate::agent::{
    AgentClient, AgentClientError, AgentEventStream, InvokeTaskRequest, InvokeTaskResult,
    TaskResult,
};

#[derive(Debug, Clone)]
enum Scripted {
    Result(InvokeTaskResult),
    Failure(String),
    Stream(Vec<SseEvent>, Option<String>),
    OpenFailure(String),
    Endless(SseEvent),
}

#[derive(Debug, Default)]
struct Inner {
    script: VecDeque<Scripted>,
    requests: Vec<InvokeTaskRequest>,
    delay: Option<Duration>,
}

/// In-memory [`AgentClient`] driven by a script
#[derive(Debug, Clone, Default)]
pub struct FakeAgentClient {
    inner: Arc<Mutex<Inner>>,
}

impl FakeAgentClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, item: Scripted) -> &Self {
        self.inner.lock().script.push_back(item);
        self
    }

    /// Next synchronous invocation succeeds with `result`
    pub fn push_result(&self, result: InvokeTaskResult) -> &Self {
        self.push(Scripted::Result(result))
    }

    /// Next invocation fails with `message`
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.push(Scripted::Failure(message.into()))
    }

    /// Next stream yields `events` then ends
    pub fn push_stream(&self, events: Vec<SseEvent>) -> &Self {
        self.push(Scripted::Stream(events, None))
    }

    /// Next stream yields `events` then fails with `message`
    pub fn push_stream_failure(&self, events: Vec<SseEvent>, message: impl Into<String>) -> &Self {
        self.push(Scripted::Stream(events, Some(message.into())))
    }

    /// Next stream cannot be opened
    pub fn push_open_failure(&self, message: impl Into<String>) -> &Self {
        self.push(Scripted::OpenFailure(message.into()))
    }

    /// Next stream repeats `event` until dropped
    pub fn push_endless_stream(&self, event: SseEvent) -> &Self {
        self.push(Scripted::Endless(event))
    }

    /// Wait `delay` before answering every invocation
    pub fn with_delay(&self, delay: Duration) -> &Self {
        self.inner.lock().delay = Some(delay);
        self
    }

    async fn wait(&self) {
        let delay = self.inner.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<InvokeTaskRequest> {
        self.inner.lock().requests.clone()
    }

    fn next(&self, request: InvokeTaskRequest) -> Option<Scripted> {
        let mut inner = self.inner.lock();
        inner.requests.push(request);
        inner.script.pop_front()
    }

    /// Result returned when nothing is scripted
    pub fn echo_result(task: &str) -> InvokeTaskResult {
        InvokeTaskResult {
            task_result: TaskResult {
                messages: vec![
                    json!({"source": "user", "type": "TextMessage", "content": task}),
                    json!({"source": "assistant", "type": "TextMessage", "content": format!("echo: {task}")}),
                ],
                stop_reason: Some("done".to_string()),
            },
            usage: None,
            duration: Some(0.0),
        }
    }

    /// Events streamed when nothing is scripted
    pub fn echo_events(task: &str) -> Vec<SseEvent> {
        vec![
            SseEvent::new(
                "TextMessage",
                json!({"source": "assistant", "content": format!("echo: {task}")}).to_string(),
            ),
            SseEvent::new("TaskResult", json!({"stop_reason": "done"}).to_string()),
        ]
    }
}

#[async_trait]
impl AgentClient for FakeAgentClient {
    async fn invoke_task(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<InvokeTaskResult, AgentClientError> {
        self.wait().await;
        let task = request.task.clone();
        match self.next(request) {
            None => Ok(Self::echo_result(&task)),
            Some(Scripted::Result(result)) => Ok(result),
            Some(Scripted::Failure(message)) | Some(Scripted::OpenFailure(message)) => {
                Err(AgentClientError::Failed(message))
            }
            Some(other) => Err(AgentClientError::InvalidResponse(format!(
                "scripted a stream for a synchronous call: {other:?}"
            ))),
        }
    }

    async fn invoke_task_stream(
        &self,
        request: InvokeTaskRequest,
    ) -> Result<AgentEventStream, AgentClientError> {
        self.wait().await;
        let task = request.task.clone();
        match self.next(request) {
            None => Ok(Box::pin(stream::iter(
                Self::echo_events(&task).into_iter().map(Ok),
            ))),
            Some(Scripted::Stream(events, failure)) => {
                let tail = failure.map(|m| Err(AgentClientError::Stream(m)));
                Ok(Box::pin(
                    stream::iter(events.into_iter().map(Ok)).chain(stream::iter(tail)),
                ))
            }
            Some(Scripted::Endless(event)) => Ok(Box::pin(
                stream::repeat(event)
                    .then(|event| async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        event
                    })
                    .map(Ok),
            )),
            Some(Scripted::OpenFailure(message)) | Some(Scripted::Failure(message)) => {
                Err(AgentClientError::Failed(message))
            }
            Some(Scripted::Result(_)) => Err(AgentClientError::InvalidResponse(
                "scripted a result for a streaming call".to_string(),
            )),
        }
    }
}
