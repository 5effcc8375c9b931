//! Team CRUD endpoint handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    models::{CreateTeamRequest, UpdateTeamRequest},
    response,
    routes::AppState,
};
use crate::db::models::Team;
use crate::db::{Clause, Store};

async fn find_team(store: &Store, user: &str, reference: &str) -> ApiResult<Team> {
    store
        .teams
        .get_by_ref(user, reference)
        .await
        .or_not_found(|| format!("Team not found: {}", reference))
}

/// GET /api/teams
pub async fn list_teams(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let teams = app_state.store.teams.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(teams))
}

/// POST /api/teams
pub async fn create_team(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateTeamRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    let name = req.validate()?;

    let created = app_state
        .store
        .teams
        .create(&Team::new(&user, name, req.component))
        .await?;
    tracing::info!(team_id = created.id, team = %created.name, "created team");
    Ok(response::created(created, "Team created successfully"))
}

/// GET /api/teams/:team
pub async fn get_team(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let team = find_team(&app_state.store, &user, &reference).await?;
    Ok(response::ok(team))
}

/// PUT /api/teams/:team
pub async fn update_team(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<UpdateTeamRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let mut team = find_team(&app_state.store, &user, &reference).await?;

    if let Some(name) = req.name {
        team.name = name.trim().to_string();
    }
    if let Some(component) = req.component {
        team.component = sqlx::types::Json(component);
    }
    team.version += 1;

    let updated = app_state.store.teams.update(&team).await?;
    tracing::info!(team_id = updated.id, version = updated.version, "updated team");
    Ok(response::ok_with_message(updated, "Team updated successfully"))
}

/// DELETE /api/teams/:team
///
/// Sessions using the team keep existing with no team.
pub async fn delete_team(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let team = find_team(&app_state.store, &user, &reference).await?;
    app_state
        .store
        .teams
        .delete(&[Clause::id(team.id), Clause::user(&user)])
        .await?;
    tracing::info!(team_id = team.id, "deleted team");
    Ok(response::message("Team deleted successfully"))
}
