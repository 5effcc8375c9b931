use crate::client::KagentClient;
use crate::error::Result;
use crate::types::{ApiResponse, CreateToolRequest, Tool, UpdateToolRequest};
use reqwest::Method;

pub struct ToolClient<'a> {
    client: &'a KagentClient,
}

impl<'a> ToolClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Tool>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "tools"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(&self, request: &CreateToolRequest, user_id: Option<&str>) -> Result<Tool> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "tools"], Some(user), Some(request))
            .await
    }

    pub async fn get(&self, tool_id: i64, user_id: Option<&str>) -> Result<Tool> {
        let user = self.client.resolve_user(user_id)?;
        let id = tool_id.to_string();
        self.client
            .call(Method::GET, &["api", "tools", &id], Some(user), None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        tool_id: i64,
        request: &UpdateToolRequest,
        user_id: Option<&str>,
    ) -> Result<Tool> {
        let user = self.client.resolve_user(user_id)?;
        let id = tool_id.to_string();
        self.client
            .call(Method::PUT, &["api", "tools", &id], Some(user), Some(request))
            .await
    }

    pub async fn delete(&self, tool_id: i64, user_id: Option<&str>) -> Result<()> {
        let user = self.client.resolve_user(user_id)?;
        let id = tool_id.to_string();
        let _: ApiResponse<serde_json::Value> = self
            .client
            .call_envelope(Method::DELETE, &["api", "tools", &id], Some(user), None::<&()>)
            .await?;
        Ok(())
    }
}
