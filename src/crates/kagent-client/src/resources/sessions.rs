use crate::client::{check_status, KagentClient};
use crate::error::{ClientError, Result};
use crate::sse::{decode_stream, SseStream};
use crate::types::{
    ApiResponse, CreateSessionRequest, InvokeTaskResult, Run, RunRequest, Session, SessionRuns,
    UpdateSessionRequest,
};
use futures::StreamExt;
use reqwest::Method;

/// Sessions and their invocation endpoints
///
/// `session` arguments accept either a numeric id or a session name.
pub struct SessionClient<'a> {
    client: &'a KagentClient,
}

impl<'a> SessionClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Session>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "sessions"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(
        &self,
        request: &CreateSessionRequest,
        user_id: Option<&str>,
    ) -> Result<Session> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "sessions"], Some(user), Some(request))
            .await
    }

    pub async fn get(&self, session: &str, user_id: Option<&str>) -> Result<Session> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "sessions", session], Some(user), None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        session: &str,
        request: &UpdateSessionRequest,
        user_id: Option<&str>,
    ) -> Result<Session> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::PUT, &["api", "sessions", session], Some(user), Some(request))
            .await
    }

    pub async fn delete(&self, session: &str, user_id: Option<&str>) -> Result<()> {
        let user = self.client.resolve_user(user_id)?;
        let _: ApiResponse<serde_json::Value> = self
            .client
            .call_envelope(Method::DELETE, &["api", "sessions", session], Some(user), None::<&()>)
            .await?;
        Ok(())
    }

    /// Runs of the session, oldest first, each with its messages
    pub async fn list_runs(&self, session: &str, user_id: Option<&str>) -> Result<Vec<Run>> {
        let user = self.client.resolve_user(user_id)?;
        let runs: SessionRuns = self
            .client
            .call(
                Method::GET,
                &["api", "sessions", session, "runs"],
                Some(user),
                None::<&()>,
            )
            .await?;
        Ok(runs.runs)
    }

    /// Run `task` synchronously and return the team result
    pub async fn invoke(
        &self,
        session: &str,
        task: &str,
        user_id: Option<&str>,
    ) -> Result<InvokeTaskResult> {
        let user = self.client.resolve_user(user_id)?;
        let body = RunRequest {
            task: task.to_string(),
        };
        self.client
            .call(
                Method::POST,
                &["api", "sessions", session, "invoke"],
                Some(user),
                Some(&body),
            )
            .await
    }

    /// Run `task` and stream the relayed events as they arrive
    pub async fn invoke_stream(
        &self,
        session: &str,
        task: &str,
        user_id: Option<&str>,
    ) -> Result<SseStream<ClientError>> {
        let user = self.client.resolve_user(user_id)?;
        let body = RunRequest {
            task: task.to_string(),
        };
        let response = self
            .client
            .request(
                Method::POST,
                &["api", "sessions", session, "invoke", "stream"],
                Some(user),
            )?
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let events = decode_stream(response.bytes_stream()).map(|r| r.map_err(ClientError::from));
        Ok(Box::pin(events))
    }
}
