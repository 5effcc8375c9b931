use crate::client::KagentClient;
use crate::error::Result;
use crate::types::{ApiResponse, CreateTeamRequest, Team, UpdateTeamRequest};
use reqwest::Method;

/// Team (agent) configurations
pub struct TeamClient<'a> {
    client: &'a KagentClient,
}

impl<'a> TeamClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Team>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "teams"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(&self, request: &CreateTeamRequest, user_id: Option<&str>) -> Result<Team> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "teams"], Some(user), Some(request))
            .await
    }

    /// `team` is a numeric id or a team name
    pub async fn get(&self, team: &str, user_id: Option<&str>) -> Result<Team> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "teams", team], Some(user), None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        team: &str,
        request: &UpdateTeamRequest,
        user_id: Option<&str>,
    ) -> Result<Team> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::PUT, &["api", "teams", team], Some(user), Some(request))
            .await
    }

    pub async fn delete(&self, team: &str, user_id: Option<&str>) -> Result<()> {
        let user = self.client.resolve_user(user_id)?;
        let _: ApiResponse<serde_json::Value> = self
            .client
            .call_envelope(Method::DELETE, &["api", "teams", team], Some(user), None::<&()>)
            .await?;
        Ok(())
    }
}
