//! Session CRUD endpoint handlers
//!
//! `:session` path segments accept a numeric id or a session name.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    models::{CreateSessionRequest, UpdateSessionRequest},
    response,
    routes::AppState,
};
use crate::db::models::Session;
use crate::db::{Clause, Store};

/// Resolve a session reference for a user, 404 when unknown
pub(crate) async fn find_session(store: &Store, user: &str, reference: &str) -> ApiResult<Session> {
    store
        .sessions
        .get_by_ref(user, reference)
        .await
        .or_not_found(|| format!("Session not found: {}", reference))
}

async fn check_team(store: &Store, user: &str, team_id: i64) -> ApiResult<()> {
    store
        .teams
        .get(&[Clause::id(team_id), Clause::user(user)])
        .await
        .or_not_found(|| format!("Team not found: {}", team_id))?;
    Ok(())
}

/// GET /api/sessions
pub async fn list_sessions(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let sessions = app_state.store.sessions.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(sessions))
}

/// POST /api/sessions
pub async fn create_session(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    let store = &app_state.store;

    let mut session = Session::new(&user, req.name_or_generated());
    if let Some(team_id) = req.team_id {
        check_team(store, &user, team_id).await?;
        session = session.with_team(team_id);
    }

    let created = store.sessions.create(&session).await?;
    tracing::info!(session_id = created.id, user = %user, "created session");
    Ok(response::created(created, "Session created successfully"))
}

/// GET /api/sessions/:session
pub async fn get_session(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&app_state.store, &user, &reference).await?;
    Ok(response::ok(session))
}

/// PUT /api/sessions/:session
pub async fn update_session(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<UpdateSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let store = &app_state.store;
    let mut session = find_session(store, &user, &reference).await?;

    if let Some(name) = req.name {
        session.name = name.trim().to_string();
    }
    if let Some(team_id) = req.team_id {
        check_team(store, &user, team_id).await?;
        session.team_id = Some(team_id);
    }

    let updated = store.sessions.update(&session).await?;
    tracing::info!(session_id = updated.id, "updated session");
    Ok(response::ok_with_message(updated, "Session updated successfully"))
}

/// DELETE /api/sessions/:session
///
/// Runs and their messages go with it.
pub async fn delete_session(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = &app_state.store;
    let session = find_session(store, &user, &reference).await?;

    store
        .sessions
        .delete(&[Clause::id(session.id), Clause::user(&user)])
        .await?;
    tracing::info!(session_id = session.id, "deleted session");
    Ok(response::message("Session deleted successfully"))
}
