//! API data transfer objects
//!
//! Request bodies with their validation rules, plus the system responses.
//! Stored rows are serialized directly from the database models.

pub mod feedback;
pub mod memory;
pub mod session;
pub mod team;
pub mod tool;

pub use feedback::CreateFeedbackRequest;
pub use memory::{CreateMemoryRequest, UpdateMemoryRequest};
pub use session::{CreateSessionRequest, RunRequest, SessionRunsResponse, UpdateSessionRequest};
pub use team::{CreateTeamRequest, UpdateTeamRequest};
pub use tool::{
    CreateToolRequest, CreateToolServerRequest, DiscoveredTool, RefreshToolsRequest,
    UpdateToolRequest, UpdateToolServerRequest,
};

use serde::{Deserialize, Serialize};

/// `data` of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Controller version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// `data` of `GET /version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub kagent_version: String,
    pub git_commit: String,
    pub build_date: String,
}

impl VersionResponse {
    pub fn current() -> Self {
        Self {
            kagent_version: crate::version::VERSION.to_string(),
            git_commit: crate::version::GIT_COMMIT.to_string(),
            build_date: crate::version::BUILD_DATE.to_string(),
        }
    }
}
