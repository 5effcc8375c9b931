//! Server configuration for kagent-server
//!
//! Loaded from TOML with `[server]`, `[database]` and `[agent]` sections.
//! Every field has a default, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::db::connection::DEFAULT_MAX_CONNECTIONS;

/// Path used for an in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind, `host:port`
    pub bind_addr: String,
    /// Name reported in logs
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8083".to_string(),
            name: "kagent-controller".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "kagent.db".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

/// Agent framework endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub url: String,
    /// Applied to every invocation, streaming included
    pub timeout_seconds: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8081/api".to_string(),
            timeout_seconds: 300,
        }
    }
}

impl AgentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub database: DatabaseConfig,
    pub agent: AgentConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ServerConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ServerConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default locations
    ///
    /// Searches, in order:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/kagent.toml
    /// 3. ./kagent.toml
    ///
    /// Falls back to defaults when none exists. A `CONFIG_PATH` that cannot
    /// be read is an error.
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/kagent.toml"),
            PathBuf::from("./kagent.toml"),
        ];
        for path in &paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::from_file(path);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `KAGENT_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; blank values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("KAGENT_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(path) = get("KAGENT_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(url) = get("KAGENT_AGENT_URL") {
            self.agent.url = url;
        }
    }

    /// Check values that would otherwise fail at startup
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        self.bind_addr()?;
        if self.database.path.trim().is_empty() {
            return Err(ServerConfigError::InvalidConfig(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.agent.url.trim().is_empty() {
            return Err(ServerConfigError::InvalidConfig(
                "agent.url must not be empty".to_string(),
            ));
        }
        if self.agent.timeout_seconds == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "agent.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ServerConfigError> {
        self.server.bind_addr.parse().map_err(|_| {
            ServerConfigError::InvalidConfig(format!(
                "server.bind_addr is not a socket address: {}",
                self.server.bind_addr
            ))
        })
    }

    /// Get database URL from configuration
    pub fn database_url(&self) -> String {
        if self.database.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", self.database.path)
        }
    }
}
