//! API route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::AgentClient;
use crate::api::{handlers, middleware};
use crate::db::{DatabaseConnection, Store};
use crate::dispatch::RunDispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub store: Store,
    pub dispatcher: RunDispatcher,
}

impl AppState {
    pub fn new(db: DatabaseConnection, agent: Arc<dyn AgentClient>) -> Self {
        let store = Store::new(&db);
        let dispatcher = RunDispatcher::new(store.clone(), agent);
        Self {
            db,
            store,
            dispatcher,
        }
    }
}

/// Build the complete API router
pub fn create_router(db: DatabaseConnection, agent: Arc<dyn AgentClient>) -> Router {
    let app_state = AppState::new(db, agent);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Sessions and runs
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/api/sessions/:session",
            get(handlers::get_session)
                .put(handlers::update_session)
                .delete(handlers::delete_session),
        )
        .route("/api/sessions/:session/runs", get(handlers::list_session_runs))
        .route("/api/sessions/:session/invoke", post(handlers::invoke_session))
        .route(
            "/api/sessions/:session/invoke/stream",
            post(handlers::invoke_session_stream),
        )
        .route("/api/runs", get(handlers::list_runs))
        .route("/api/runs/:id", get(handlers::get_run))
        // Teams
        .route(
            "/api/teams",
            get(handlers::list_teams).post(handlers::create_team),
        )
        .route(
            "/api/teams/:team",
            get(handlers::get_team)
                .put(handlers::update_team)
                .delete(handlers::delete_team),
        )
        // Tools and tool servers
        .route(
            "/api/tools",
            get(handlers::list_tools).post(handlers::create_tool),
        )
        .route(
            "/api/tools/:id",
            get(handlers::get_tool)
                .put(handlers::update_tool)
                .delete(handlers::delete_tool),
        )
        .route(
            "/api/toolservers",
            get(handlers::list_tool_servers).post(handlers::create_tool_server),
        )
        .route(
            "/api/toolservers/:server",
            get(handlers::get_tool_server)
                .put(handlers::update_tool_server)
                .delete(handlers::delete_tool_server),
        )
        .route(
            "/api/toolservers/:server/tools",
            get(handlers::list_server_tools).put(handlers::refresh_server_tools),
        )
        // Memories and feedback
        .route(
            "/api/memories",
            get(handlers::list_memories).post(handlers::create_memory),
        )
        .route(
            "/api/memories/:name",
            get(handlers::get_memory)
                .put(handlers::update_memory)
                .delete(handlers::delete_memory),
        )
        .route(
            "/api/feedback",
            get(handlers::list_feedback).post(handlers::create_feedback),
        )
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(app_state)
}
