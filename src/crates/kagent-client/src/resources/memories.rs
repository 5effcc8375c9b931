use crate::client::KagentClient;
use crate::error::Result;
use crate::types::{ApiResponse, CreateMemoryRequest, Memory, UpdateMemoryRequest};
use reqwest::Method;

/// Memory provider registrations
pub struct MemoryClient<'a> {
    client: &'a KagentClient,
}

impl<'a> MemoryClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Memory>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "memories"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(
        &self,
        request: &CreateMemoryRequest,
        user_id: Option<&str>,
    ) -> Result<Memory> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "memories"], Some(user), Some(request))
            .await
    }

    pub async fn get(&self, name: &str, user_id: Option<&str>) -> Result<Memory> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "memories", name], Some(user), None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        name: &str,
        request: &UpdateMemoryRequest,
        user_id: Option<&str>,
    ) -> Result<Memory> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::PUT, &["api", "memories", name], Some(user), Some(request))
            .await
    }

    pub async fn delete(&self, name: &str, user_id: Option<&str>) -> Result<()> {
        let user = self.client.resolve_user(user_id)?;
        let _: ApiResponse<serde_json::Value> = self
            .client
            .call_envelope(Method::DELETE, &["api", "memories", name], Some(user), None::<&()>)
            .await?;
        Ok(())
    }
}
