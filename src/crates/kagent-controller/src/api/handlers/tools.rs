//! Tool CRUD endpoint handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    middleware::parse_id,
    models::{CreateToolRequest, UpdateToolRequest},
    response,
    routes::AppState,
};
use crate::db::models::Tool;
use crate::db::{Clause, Store};

async fn find_tool(store: &Store, user: &str, id: &str) -> ApiResult<Tool> {
    let id = parse_id(id, "tool")?;
    store
        .tools
        .get(&[Clause::id(id), Clause::user(user)])
        .await
        .or_not_found(|| format!("Tool not found: {}", id))
}

async fn check_server(store: &Store, user: &str, server_id: i64) -> ApiResult<()> {
    store
        .tool_servers
        .get(&[Clause::id(server_id), Clause::user(user)])
        .await
        .or_not_found(|| format!("Tool server not found: {}", server_id))?;
    Ok(())
}

/// GET /api/tools
pub async fn list_tools(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let tools = app_state.store.tools.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(tools))
}

/// POST /api/tools
pub async fn create_tool(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateToolRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    let name = req.validate()?;
    let store = &app_state.store;

    let mut tool = Tool::new(&user, name, req.component);
    if let Some(server_id) = req.server_id {
        check_server(store, &user, server_id).await?;
        tool = tool.on_server(server_id);
    }

    let created = store.tools.create(&tool).await?;
    tracing::info!(tool_id = created.id, tool = %created.name, "created tool");
    Ok(response::created(created, "Tool created successfully"))
}

/// GET /api/tools/:id
pub async fn get_tool(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tool = find_tool(&app_state.store, &user, &id).await?;
    Ok(response::ok(tool))
}

/// PUT /api/tools/:id
pub async fn update_tool(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateToolRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let store = &app_state.store;
    let mut tool = find_tool(store, &user, &id).await?;

    if let Some(name) = req.name {
        tool.name = name.trim().to_string();
    }
    if let Some(component) = req.component {
        tool.component = sqlx::types::Json(component);
    }
    if let Some(server_id) = req.server_id {
        check_server(store, &user, server_id).await?;
        tool.server_id = Some(server_id);
    }

    let updated = store.tools.update(&tool).await?;
    Ok(response::ok_with_message(updated, "Tool updated successfully"))
}

/// DELETE /api/tools/:id
pub async fn delete_tool(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tool = find_tool(&app_state.store, &user, &id).await?;
    app_state
        .store
        .tools
        .delete(&[Clause::id(tool.id), Clause::user(&user)])
        .await?;
    tracing::info!(tool_id = tool.id, "deleted tool");
    Ok(response::message("Tool deleted successfully"))
}
