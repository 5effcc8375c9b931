//! Client configuration for connecting to the kagent controller

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default controller address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8083";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Controller base URL (e.g., "http://localhost:8083"), without the `/api` prefix
    pub base_url: String,

    /// User id sent with user scoped calls when no explicit one is given
    pub user_id: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Set the default user id
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Apply `KAGENT_URL` and `KAGENT_USER_ID` overrides from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("KAGENT_URL") {
            if !url.trim().is_empty() {
                self.base_url = normalize_base_url(url);
            }
        }
        if let Ok(user_id) = std::env::var("KAGENT_USER_ID") {
            if !user_id.trim().is_empty() {
                self.user_id = Some(user_id);
            }
        }
        self
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: ClientConfig = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))?;
        config.base_url = normalize_base_url(config.base_url);
        Ok(config)
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ClientError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ClientError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://kagent.local:8083///");
        assert_eq!(config.base_url, "http://kagent.local:8083");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str("user_id = \"alice\"\n").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ClientConfig::from_toml_str("timeout_seconds = \"soon\"").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
