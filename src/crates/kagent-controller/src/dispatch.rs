//! Session invocation dispatch
//!
//! Every invocation first inserts a Run row, so an audit record exists even
//! when the agent framework call fails. The run then moves to `active` and
//! finally to `complete` or `error`. Status writes after the insert are
//! best-effort: a failed write is logged and the caller still gets the
//! agent's outcome.

use std::sync::Arc;

use futures::StreamExt;
use kagent_client::SseEvent;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::agent::{AgentClient, AgentClientError, AgentEventStream, InvokeTaskRequest, InvokeTaskResult};
use crate::db::models::{Run, Session};
use crate::db::{Clause, DatabaseError, Store};

/// Event type sent to the client when the upstream stream fails
pub const ERROR_EVENT: &str = "error";

/// Error message recorded when the client goes away mid-stream
pub const CLIENT_DISCONNECTED: &str = "client disconnected";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to invoke session: {0}")]
    Agent(#[source] AgentClientError),

    #[error("failed to encode team result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invocation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Outcome of a synchronous invocation
#[derive(Debug, Clone)]
pub struct InvokeOutcome {
    /// The run in its terminal state
    pub run: Run,
    pub result: InvokeTaskResult,
}

/// A streaming invocation in progress
pub struct StreamingRun {
    /// The run as it was when the stream opened
    pub run: Run,
    /// Events relayed from the agent framework, one at a time
    pub events: mpsc::Receiver<SseEvent>,
    /// Resolves to the run in its terminal state once the relay finishes
    pub relay: JoinHandle<Run>,
}

/// Creates runs and hands them to the agent framework
#[derive(Clone)]
pub struct RunDispatcher {
    store: Store,
    agent: Arc<dyn AgentClient>,
}

impl RunDispatcher {
    pub fn new(store: Store, agent: Arc<dyn AgentClient>) -> Self {
        Self { store, agent }
    }

    /// Insert the run and move it to `active`
    async fn start_run(&self, session: &Session, task: &str) -> Result<Run, DispatchError> {
        let mut run = self
            .store
            .runs
            .create(&Run::new(&session.user_id, session.id, task))
            .await?;
        tracing::info!(run_id = run.id, session_id = session.id, "created run");

        run.mark_active();
        persist(&self.store, &run).await;
        Ok(run)
    }

    /// Component of the session's team, or `None` when it has no team
    async fn team_config(&self, session: &Session) -> Result<Option<Value>, DatabaseError> {
        match session.team_id {
            None => Ok(None),
            Some(team_id) => {
                let team = self
                    .store
                    .teams
                    .get(&[Clause::id(team_id), Clause::user(&session.user_id)])
                    .await?;
                Ok(Some(team.component.0))
            }
        }
    }

    /// Build the framework request, failing the run if the team is gone
    async fn prepare(
        &self,
        session: &Session,
        task: &str,
    ) -> Result<(Run, InvokeTaskRequest), DispatchError> {
        let mut run = self.start_run(session, task).await?;

        match self.team_config(session).await {
            Ok(team_config) => Ok((
                run,
                InvokeTaskRequest {
                    task: task.to_string(),
                    team_config,
                },
            )),
            Err(e) => {
                run.mark_error(e.to_string());
                persist(&self.store, &run).await;
                Err(e.into())
            }
        }
    }

    /// Run a task to completion and record the result
    ///
    /// The work runs on its own task, so the run still reaches `complete`
    /// or `error` when the caller stops waiting.
    pub async fn invoke(&self, session: &Session, task: &str) -> Result<InvokeOutcome, DispatchError> {
        let dispatcher = self.clone();
        let session = session.clone();
        let task = task.to_string();
        tokio::spawn(async move { dispatcher.run_to_completion(&session, &task).await }).await?
    }

    async fn run_to_completion(
        &self,
        session: &Session,
        task: &str,
    ) -> Result<InvokeOutcome, DispatchError> {
        let (mut run, request) = self.prepare(session, task).await?;

        let result = match self.agent.invoke_task(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(run_id = run.id, error = %e, "team invocation failed");
                run.mark_error(e.to_string());
                persist(&self.store, &run).await;
                return Err(DispatchError::Agent(e));
            }
        };

        run.mark_complete(serde_json::to_value(&result)?);
        persist(&self.store, &run).await;

        if let Err(e) = self
            .store
            .record_run_messages(&run, &result.task_result.messages)
            .await
        {
            tracing::error!(run_id = run.id, error = %e, "failed to record run messages");
        }

        Ok(InvokeOutcome { run, result })
    }

    /// Open the framework's event stream and relay it in the background
    ///
    /// The relay forwards one event at a time; it stops reading upstream
    /// as soon as the receiver is dropped.
    pub async fn invoke_stream(
        &self,
        session: &Session,
        task: &str,
    ) -> Result<StreamingRun, DispatchError> {
        let dispatcher = self.clone();
        let session = session.clone();
        let task = task.to_string();
        tokio::spawn(async move { dispatcher.open_stream(&session, &task).await }).await?
    }

    async fn open_stream(&self, session: &Session, task: &str) -> Result<StreamingRun, DispatchError> {
        let (mut run, request) = self.prepare(session, task).await?;

        let upstream = match self.agent.invoke_task_stream(request).await {
            Ok(upstream) => upstream,
            Err(e) => {
                tracing::warn!(run_id = run.id, error = %e, "failed to open team event stream");
                run.mark_error(e.to_string());
                persist(&self.store, &run).await;
                return Err(DispatchError::Agent(e));
            }
        };

        let (tx, rx) = mpsc::channel(1);
        let relay = tokio::spawn(relay(self.store.clone(), run.clone(), upstream, tx));

        Ok(StreamingRun {
            run,
            events: rx,
            relay,
        })
    }
}

async fn relay(
    store: Store,
    mut run: Run,
    mut upstream: AgentEventStream,
    tx: mpsc::Sender<SseEvent>,
) -> Run {
    let mut count: u64 = 0;
    let mut last: Option<SseEvent> = None;

    let outcome: Result<(), String> = loop {
        tokio::select! {
            item = upstream.next() => match item {
                Some(Ok(event)) => {
                    count += 1;
                    last = Some(event.clone());
                    if tx.send(event).await.is_err() {
                        break Err(CLIENT_DISCONNECTED.to_string());
                    }
                }
                Some(Err(e)) => {
                    let message = e.to_string();
                    let event = SseEvent::new(ERROR_EVENT, json!({ "error": message }).to_string());
                    if tx.send(event).await.is_err() {
                        tracing::debug!(run_id = run.id, "client gone before error event");
                    }
                    break Err(message);
                }
                None => break Ok(()),
            },
            _ = tx.closed() => break Err(CLIENT_DISCONNECTED.to_string()),
        }
    };
    drop(upstream);

    match outcome {
        Ok(()) => {
            tracing::info!(run_id = run.id, events = count, "team event stream finished");
            let last_event = last.map(|e| json!({ "event": e.event, "data": e.data }));
            run.mark_complete(json!({ "events": count, "last_event": last_event }));
        }
        Err(message) => {
            tracing::warn!(run_id = run.id, events = count, error = %message, "team event stream aborted");
            run.mark_error(message);
        }
    }
    persist(&store, &run).await;
    run
}

/// Best-effort status write
async fn persist(store: &Store, run: &Run) {
    if let Err(e) = store.runs.update(run).await {
        tracing::error!(run_id = run.id, status = %run.status, error = %e, "failed to update run");
    }
}
