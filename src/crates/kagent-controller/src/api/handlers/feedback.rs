//! Feedback endpoint handlers

use axum::{extract::State, response::IntoResponse};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    models::CreateFeedbackRequest,
    response,
    routes::AppState,
};
use crate::db::models::Feedback;
use crate::db::Clause;

/// GET /api/feedback
pub async fn list_feedback(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let feedback = app_state.store.feedback.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(feedback))
}

/// POST /api/feedback
pub async fn create_feedback(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateFeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    let issue_type = req.validate()?;
    let store = &app_state.store;

    let mut feedback = Feedback::new(&user, req.is_positive, req.feedback_text.trim());
    feedback.issue_type = issue_type;
    if let Some(message_id) = req.message_id {
        store
            .messages
            .get(&[Clause::id(message_id), Clause::user(&user)])
            .await
            .or_not_found(|| format!("Message not found: {}", message_id))?;
        feedback.message_id = Some(message_id);
    }

    let created = store.feedback.create(&feedback).await?;
    tracing::info!(
        feedback_id = created.id,
        positive = created.is_positive,
        "recorded feedback"
    );
    Ok(response::created(created, "Feedback submitted successfully"))
}
