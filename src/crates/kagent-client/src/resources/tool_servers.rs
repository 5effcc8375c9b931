use crate::client::KagentClient;
use crate::error::Result;
use crate::types::{
    ApiResponse, CreateToolServerRequest, DiscoveredTool, RefreshToolsRequest, Tool, ToolServer,
    UpdateToolServerRequest,
};
use reqwest::Method;

/// Tool servers and the tools they host
///
/// `server` arguments accept a numeric id or a server name.
pub struct ToolServerClient<'a> {
    client: &'a KagentClient,
}

impl<'a> ToolServerClient<'a> {
    pub(crate) fn new(client: &'a KagentClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<ToolServer>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "toolservers"], Some(user), None::<&()>)
            .await
    }

    pub async fn create(
        &self,
        request: &CreateToolServerRequest,
        user_id: Option<&str>,
    ) -> Result<ToolServer> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::POST, &["api", "toolservers"], Some(user), Some(request))
            .await
    }

    pub async fn get(&self, server: &str, user_id: Option<&str>) -> Result<ToolServer> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::GET, &["api", "toolservers", server], Some(user), None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        server: &str,
        request: &UpdateToolServerRequest,
        user_id: Option<&str>,
    ) -> Result<ToolServer> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(Method::PUT, &["api", "toolservers", server], Some(user), Some(request))
            .await
    }

    /// Delete the server and every tool it hosts
    pub async fn delete(&self, server: &str, user_id: Option<&str>) -> Result<()> {
        let user = self.client.resolve_user(user_id)?;
        let _: ApiResponse<serde_json::Value> = self
            .client
            .call_envelope(Method::DELETE, &["api", "toolservers", server], Some(user), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn list_tools(&self, server: &str, user_id: Option<&str>) -> Result<Vec<Tool>> {
        let user = self.client.resolve_user(user_id)?;
        self.client
            .call(
                Method::GET,
                &["api", "toolservers", server, "tools"],
                Some(user),
                None::<&()>,
            )
            .await
    }

    /// Replace the server's tool set with `tools`, matched by name
    pub async fn refresh_tools(
        &self,
        server: &str,
        tools: Vec<DiscoveredTool>,
        user_id: Option<&str>,
    ) -> Result<Vec<Tool>> {
        let user = self.client.resolve_user(user_id)?;
        let body = RefreshToolsRequest { tools };
        self.client
            .call(
                Method::PUT,
                &["api", "toolservers", server, "tools"],
                Some(user),
                Some(&body),
            )
            .await
    }
}
