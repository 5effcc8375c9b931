//! Tool server endpoint handlers
//!
//! Deleting a server deletes its tools. Updating a server, including an
//! empty update, records it as just connected.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    models::{CreateToolServerRequest, RefreshToolsRequest, UpdateToolServerRequest},
    response,
    routes::AppState,
};
use crate::db::models::ToolServer;
use crate::db::{Clause, Order, Store};

async fn find_server(store: &Store, user: &str, reference: &str) -> ApiResult<ToolServer> {
    store
        .tool_servers
        .get_by_ref(user, reference)
        .await
        .or_not_found(|| format!("Tool server not found: {}", reference))
}

/// GET /api/toolservers
pub async fn list_tool_servers(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let servers = app_state.store.tool_servers.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(servers))
}

/// POST /api/toolservers
pub async fn create_tool_server(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateToolServerRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    req.validate()?;

    let server = ToolServer::new(&user, req.name.trim(), req.component);
    let created = app_state.store.tool_servers.create(&server).await?;
    tracing::info!(server_id = created.id, server = %created.name, "registered tool server");
    Ok(response::created(created, "Tool server created successfully"))
}

/// GET /api/toolservers/:server
pub async fn get_tool_server(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let server = find_server(&app_state.store, &user, &reference).await?;
    Ok(response::ok(server))
}

/// PUT /api/toolservers/:server
pub async fn update_tool_server(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<UpdateToolServerRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let mut server = find_server(&app_state.store, &user, &reference).await?;

    if let Some(component) = req.component {
        server.component = sqlx::types::Json(component);
    }
    server.touch_connected();

    let updated = app_state.store.tool_servers.update(&server).await?;
    Ok(response::ok_with_message(updated, "Tool server updated successfully"))
}

/// DELETE /api/toolservers/:server
pub async fn delete_tool_server(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = &app_state.store;
    let server = find_server(store, &user, &reference).await?;

    let tools = store.delete_tool_server(&server).await?;
    tracing::info!(server_id = server.id, tools_removed = tools, "deleted tool server");
    Ok(response::message("Tool server deleted successfully"))
}

/// GET /api/toolservers/:server/tools
pub async fn list_server_tools(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = &app_state.store;
    let server = find_server(store, &user, &reference).await?;

    let tools = store
        .tools
        .list_ordered(
            Order::OldestFirst,
            &[Clause::new("server_id", server.id), Clause::user(&user)],
        )
        .await?;
    Ok(response::ok(tools))
}

/// PUT /api/toolservers/:server/tools
///
/// Replaces the server's tool set with the reported one, matching by name.
pub async fn refresh_server_tools(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(reference): Path<String>,
    JsonBody(req): JsonBody<RefreshToolsRequest>,
) -> ApiResult<impl IntoResponse> {
    let discovered = req.into_pairs()?;
    let store = &app_state.store;
    let server = find_server(store, &user, &reference).await?;

    let tools = store.refresh_tools_for_server(&server, discovered).await?;
    tracing::info!(server_id = server.id, tools = tools.len(), "refreshed server tools");
    Ok(response::ok_with_message(tools, "Tools refreshed successfully"))
}
