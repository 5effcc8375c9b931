//! Request validation helpers

use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};

/// Reject blank strings
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field_name)));
    }
    Ok(())
}

/// Component payloads must be JSON objects
pub fn require_object(value: &Value, field_name: &str) -> ApiResult<()> {
    if !value.is_object() {
        return Err(ApiError::BadRequest(format!("{} must be a JSON object", field_name)));
    }
    Ok(())
}

/// Parse a numeric path id
pub fn parse_id(value: &str, what: &str) -> ApiResult<i64> {
    value
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid {} id: {}", what, value)))
}

/// Name from `component.label`, used when a create request omits the name
pub fn component_label(component: &Value) -> Option<String> {
    component
        .get("label")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
