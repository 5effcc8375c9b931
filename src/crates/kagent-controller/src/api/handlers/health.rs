//! Health and version endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::api::{
    models::{HealthResponse, VersionResponse},
    response::{self, ApiResponse},
    routes::AppState,
};

/// GET /health
///
/// Pings the database; 503 when it does not answer.
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(HealthResponse::new("ok", "connected"))),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            let body = ApiResponse {
                status: false,
                data: Some(HealthResponse::new("error", "error")),
                message: Some(e.to_string()),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}

/// GET /version
pub async fn version() -> impl IntoResponse {
    response::ok(VersionResponse::current())
}
