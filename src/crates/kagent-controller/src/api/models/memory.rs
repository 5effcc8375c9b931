//! Memory provider DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::{require_object, validate_not_empty};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    pub name: String,
    pub provider: String,
    /// Name of the secret holding the API key
    #[serde(default)]
    pub api_key_secret_ref: String,
    /// Key within that secret
    #[serde(default)]
    pub api_key_secret_key: String,
    #[serde(default)]
    pub memory_params: Option<Value>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateMemoryRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        validate_not_empty(&self.provider, "provider")?;
        if let Some(params) = &self.memory_params {
            require_object(params, "memory_params")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMemoryRequest {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api_key_secret_ref: Option<String>,
    #[serde(default)]
    pub api_key_secret_key: Option<String>,
    #[serde(default)]
    pub memory_params: Option<Value>,
}

impl UpdateMemoryRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if self.provider.is_none()
            && self.api_key_secret_ref.is_none()
            && self.api_key_secret_key.is_none()
            && self.memory_params.is_none()
        {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }
        if let Some(provider) = &self.provider {
            validate_not_empty(provider, "provider")?;
        }
        if let Some(params) = &self.memory_params {
            require_object(params, "memory_params")?;
        }
        Ok(())
    }
}
