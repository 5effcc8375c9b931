//! Run listing and session invocation handlers

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::{Stream, StreamExt};
use kagent_client::SseEvent;
use tokio_stream::wrappers::ReceiverStream;

use super::sessions::find_session;
use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, UserId},
    middleware::parse_id,
    models::{RunRequest, SessionRunsResponse},
    response,
    routes::AppState,
};
use crate::db::Clause;

/// GET /api/runs
pub async fn list_runs(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let runs = app_state.store.runs.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(runs))
}

/// GET /api/runs/:id
pub async fn get_run(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "run")?;
    let run = app_state
        .store
        .runs
        .get(&[Clause::id(id), Clause::user(&user)])
        .await
        .or_not_found(|| format!("Run not found: {}", id))?;
    Ok(response::ok(run))
}

/// GET /api/sessions/:session/runs
pub async fn list_session_runs(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = find_session(&app_state.store, &user, &reference).await?;
    let runs = app_state.store.session_runs(&session).await?;
    Ok(response::ok(SessionRunsResponse { runs }))
}

/// POST /api/sessions/:session/invoke
pub async fn invoke_session(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<RunRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let session = find_session(&app_state.store, &user, &reference).await?;

    let outcome = app_state.dispatcher.invoke(&session, &req.task).await?;
    Ok(response::ok_with_message(
        outcome.result,
        format!("Run {} completed", outcome.run.id),
    ))
}

/// POST /api/sessions/:session/invoke/stream
///
/// Relays the team's events as Server-Sent Events. Event types and payloads
/// pass through unchanged.
pub async fn invoke_session_stream(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<RunRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    req.validate()?;
    let session = find_session(&app_state.store, &user, &reference).await?;

    let streaming = app_state.dispatcher.invoke_stream(&session, &req.task).await?;
    tracing::info!(run_id = streaming.run.id, "streaming run events");

    let events = ReceiverStream::new(streaming.events).map(|e| Ok(to_sse_event(e)));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Build an axum event; carriage returns cannot be sent over SSE
fn to_sse_event(event: SseEvent) -> Event {
    let name: String = event
        .event
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();
    let data = event.data.replace('\r', "");
    Event::default().event(name).data(data)
}
