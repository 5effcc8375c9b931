use crate::client::KagentClient;
use crate::error::Result;
use crate::types::Run;
use reqwest::Method;

/// Read access to runs across all sessions of a user
pub struct RunClient<'a> {
    client: &'a KagentClient,
}

impl<'a> RunClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    /// All runs of the user, newest first
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Run>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "runs"], Some(user), None::<&()>)
            .await
    }

    pub async fn get(&self, run_id: i64, user_id: Option<&str>) -> Result<Run> {
        let user = self.client.resolve_user(user_id)?;
        let id = run_id.to_string();
        self.client
            .call(Method::GET, &["api", "runs", &id], Some(user), None::<&()>)
            .await
    }
}
