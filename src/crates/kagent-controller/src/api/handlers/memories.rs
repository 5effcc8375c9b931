//! Memory provider endpoint handlers
//!
//! Memories are addressed by name.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiResult, DbResultExt},
    extract::{JsonBody, RequestUser, UserId},
    models::{CreateMemoryRequest, UpdateMemoryRequest},
    response,
    routes::AppState,
};
use crate::db::models::Memory;
use crate::db::{Clause, Store};

async fn find_memory(store: &Store, user: &str, name: &str) -> ApiResult<Memory> {
    store
        .memories
        .get(&[Clause::name(name), Clause::user(user)])
        .await
        .or_not_found(|| format!("Memory not found: {}", name))
}

/// GET /api/memories
pub async fn list_memories(
    State(app_state): State<AppState>,
    UserId(user): UserId,
) -> ApiResult<impl IntoResponse> {
    let memories = app_state.store.memories.list(&[Clause::user(&user)]).await?;
    Ok(response::ok(memories))
}

/// POST /api/memories
pub async fn create_memory(
    State(app_state): State<AppState>,
    user: RequestUser,
    JsonBody(req): JsonBody<CreateMemoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = user.or_body(req.user_id.clone())?;
    req.validate()?;

    let mut memory = Memory::new(&user, req.name.trim(), req.provider.trim());
    memory.api_key_secret_ref = req.api_key_secret_ref;
    memory.api_key_secret_key = req.api_key_secret_key;
    if let Some(params) = req.memory_params {
        memory.memory_params = sqlx::types::Json(params);
    }

    let created = app_state.store.memories.create(&memory).await?;
    tracing::info!(memory = %created.name, provider = %created.provider, "created memory");
    Ok(response::created(created, "Memory created successfully"))
}

/// GET /api/memories/:name
pub async fn get_memory(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let memory = find_memory(&app_state.store, &user, &name).await?;
    Ok(response::ok(memory))
}

/// PUT /api/memories/:name
pub async fn update_memory(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(name): Path<String>,
    JsonBody(req): JsonBody<UpdateMemoryRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let mut memory = find_memory(&app_state.store, &user, &name).await?;

    if let Some(provider) = req.provider {
        memory.provider = provider.trim().to_string();
    }
    if let Some(secret_ref) = req.api_key_secret_ref {
        memory.api_key_secret_ref = secret_ref;
    }
    if let Some(secret_key) = req.api_key_secret_key {
        memory.api_key_secret_key = secret_key;
    }
    if let Some(params) = req.memory_params {
        memory.memory_params = sqlx::types::Json(params);
    }

    let updated = app_state.store.memories.update(&memory).await?;
    Ok(response::ok_with_message(updated, "Memory updated successfully"))
}

/// DELETE /api/memories/:name
pub async fn delete_memory(
    State(app_state): State<AppState>,
    UserId(user): UserId,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let memory = find_memory(&app_state.store, &user, &name).await?;
    app_state
        .store
        .memories
        .delete(&[Clause::id(memory.id), Clause::user(&user)])
        .await?;
    Ok(response::message("Memory deleted successfully"))
}
