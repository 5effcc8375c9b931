//! Team DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::{component_label, require_object, validate_not_empty};

/// Request to create a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    /// Defaults to `component.label`
    #[serde(default)]
    pub name: Option<String>,

    /// Agent graph description, stored verbatim
    pub component: Value,

    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateTeamRequest {
    /// Validate and return the effective name
    pub fn validate(&self) -> ApiResult<String> {
        require_object(&self.component, "component")?;
        let name = self
            .name
            .clone()
            .or_else(|| component_label(&self.component))
            .unwrap_or_default();
        validate_not_empty(&name, "name")?;
        Ok(name.trim().to_string())
    }
}

/// Request to update a team; bumps its version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub component: Option<Value>,
}

impl UpdateTeamRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if self.name.is_none() && self.component.is_none() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }
        if let Some(name) = &self.name {
            validate_not_empty(name, "name")?;
        }
        if let Some(component) = &self.component {
            require_object(component, "component")?;
        }
        Ok(())
    }
}
