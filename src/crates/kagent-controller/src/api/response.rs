//! API response helpers
//!
//! Success bodies use the `{status: true, data, message}` envelope.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// 200 with `data`
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::new(data)))
}

/// 200 with `data` and a message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::new(data).with_message(message)))
}

/// 201 with `data` and a message
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::new(data).with_message(message)))
}

/// 200 with only a message
pub fn message(message: impl Into<String>) -> impl IntoResponse {
    let body: ApiResponse<()> = ApiResponse {
        status: true,
        data: None,
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body))
}
