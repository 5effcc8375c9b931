//! HTTP client for the kagent controller
//!
//! [`KagentClient`] owns the connection pool and configuration and hands out
//! borrowed per-resource clients. All responses are unwrapped from the
//! `{status, data, message}` envelope.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::resources::{
    FeedbackClient, MemoryClient, RunClient, SessionClient, TeamClient, ToolClient,
    ToolServerClient,
};
use crate::types::{ApiResponse, HealthStatus, VersionInfo};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Client for the kagent REST API
#[derive(Debug, Clone)]
pub struct KagentClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl KagentClient {
    /// Create a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        // fail early on an unusable base URL
        Url::parse(&config.base_url)
            .map_err(|e| ClientError::Url(format!("{}: {}", config.base_url, e)))?;

        Ok(Self { http, config })
    }

    /// Create a client for `base_url` acting as `user_id`
    pub fn for_user(base_url: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(base_url).with_user_id(user_id))
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sessions(&self) -> SessionClient<'_> {
        SessionClient::new(self)
    }

    pub fn runs(&self) -> RunClient<'_> {
        RunClient::new(self)
    }

    pub fn teams(&self) -> TeamClient<'_> {
        TeamClient::new(self)
    }

    pub fn tools(&self) -> ToolClient<'_> {
        ToolClient::new(self)
    }

    pub fn tool_servers(&self) -> ToolServerClient<'_> {
        ToolServerClient::new(self)
    }

    pub fn memories(&self) -> MemoryClient<'_> {
        MemoryClient::new(self)
    }

    pub fn feedback(&self) -> FeedbackClient<'_> {
        FeedbackClient::new(self)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.call(Method::GET, &["health"], None, None::<&()>).await
    }

    /// `GET /version`
    pub async fn version(&self) -> Result<VersionInfo> {
        self.call(Method::GET, &["version"], None, None::<&()>).await
    }

    /// Pick the explicit user id, falling back to the configured default
    pub(crate) fn resolve_user<'a>(&'a self, user_id: Option<&'a str>) -> Result<&'a str> {
        user_id
            .or(self.config.user_id.as_deref())
            .filter(|u| !u.trim().is_empty())
            .ok_or(ClientError::MissingUserId)
    }

    /// Join percent-encoded path segments onto the base URL
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ClientError::Url(format!("{}: {}", self.config.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{} cannot be a base", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        user_id: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "kagent request");

        let mut builder = self.http.request(method, url);
        if let Some(user_id) = user_id {
            builder = builder.query(&[("user_id", user_id)]);
        }
        Ok(builder)
    }

    /// Send and unwrap the envelope, requiring `data`
    pub(crate) async fn call<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        user_id: Option<&str>,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let what = segments.join("/");
        let envelope: ApiResponse<T> = self.call_envelope(method, segments, user_id, body).await?;
        envelope.data.ok_or(ClientError::MissingData(what))
    }

    /// Send and return the raw envelope
    pub(crate) async fn call_envelope<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        user_id: Option<&str>,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, segments, user_id)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = check_status(builder.send().await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Turn HTTP >= 400 into [`ClientError::Api`]
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::from_response(status.as_u16(), body));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> KagentClient {
        KagentClient::new(ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let c = client("http://localhost:8083/");
        let url = c.endpoint(&["api", "sessions", "my session"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8083/api/sessions/my%20session");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("http://proxy.local/kagent");
        let url = c.endpoint(&["api", "teams"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/kagent/api/teams");
    }

    #[test]
    fn test_resolve_user_prefers_explicit() {
        let c = KagentClient::for_user("http://localhost:8083", "default-user").unwrap();
        assert_eq!(c.resolve_user(Some("alice")).unwrap(), "alice");
        assert_eq!(c.resolve_user(None).unwrap(), "default-user");
    }

    #[test]
    fn test_resolve_user_missing() {
        let c = client("http://localhost:8083");
        assert!(matches!(c.resolve_user(None), Err(ClientError::MissingUserId)));
        assert!(matches!(c.resolve_user(Some("  ")), Err(ClientError::MissingUserId)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = KagentClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::Url(_)));
    }
}
