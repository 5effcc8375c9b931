//! Session and invocation DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validate_not_empty;
use crate::db::RunWithMessages;

/// Request to create a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Generated when omitted
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub team_id: Option<i64>,

    /// Accepted when the query and header carry no user
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateSessionRequest {
    /// The requested name, or `session-<8 hex chars>`
    pub fn name_or_generated(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                format!("session-{}", &id[..8])
            }
        }
    }
}

/// Request to update a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub team_id: Option<i64>,
}

impl UpdateSessionRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some() || self.team_id.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if !self.has_updates() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }
        if let Some(name) = &self.name {
            validate_not_empty(name, "name")?;
        }
        Ok(())
    }
}

/// Body of both invoke endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub task: String,
}

impl RunRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.task, "task")
    }
}

/// `data` of `GET /api/sessions/:session/runs`
#[derive(Debug, Clone, Serialize)]
pub struct SessionRunsResponse {
    pub runs: Vec<RunWithMessages>,
}
