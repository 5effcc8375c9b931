//! Tool and tool server DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::{component_label, require_object, validate_not_empty};

/// Request to create a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToolRequest {
    /// Defaults to `component.label`
    #[serde(default)]
    pub name: Option<String>,

    pub component: Value,

    /// Hosting server, if any
    #[serde(default)]
    pub server_id: Option<i64>,

    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateToolRequest {
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateToolRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub component: Option<Value>,
    #[serde(default)]
    pub server_id: Option<i64>,
}

impl UpdateToolRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if self.name.is_none() && self.component.is_none() && self.server_id.is_none() {
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

/// Request to register a tool server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToolServerRequest {
    pub name: String,

    /// Connection parameters, stored verbatim
    pub component: Value,

    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateToolServerRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        require_object(&self.component, "component")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateToolServerRequest {
    #[serde(default)]
    pub component: Option<Value>,
}

impl UpdateToolServerRequest {
    /// An empty update is allowed; it only refreshes `last_connected`
    pub fn validate(&self) -> ApiResult<()> {
        match &self.component {
            Some(component) => require_object(component, "component"),
            None => Ok(()),
        }
    }
}

/// A tool reported by its server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredTool {
    pub name: String,
    pub component: Value,
}

/// Full tool set currently reported by a server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToolsRequest {
    pub tools: Vec<DiscoveredTool>,
}

impl RefreshToolsRequest {
    /// Validate and return `(name, component)` pairs
    pub fn into_pairs(self) -> ApiResult<Vec<(String, Value)>> {
        let mut pairs: Vec<(String, Value)> = Vec::with_capacity(self.tools.len());
        for tool in self.tools {
            validate_not_empty(&tool.name, "tool name")?;
            require_object(&tool.component, "component")?;
            let name = tool.name.trim().to_string();
            if pairs.iter().any(|(n, _)| n == &name) {
                return Err(ApiError::BadRequest(format!("duplicate tool name: {}", name)));
            }
            pairs.push((name, tool.component));
        }
        Ok(pairs)
    }
}
