//! kagent control plane
//!
//! Persists sessions, runs, teams, tools, tool servers, memories and
//! feedback in SQLite and serves them over a REST API. Invoking a session
//! records a run and hands the task to the external agent framework,
//! either synchronously or as a relayed Server-Sent-Events stream.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use kagent_controller::agent::HttpAgentClient;
//! use kagent_controller::api::create_router;
//! use kagent_controller::db::DatabaseConnection;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let db = DatabaseConnection::new("sqlite://kagent.db").await?;
//! db.run_migrations().await?;
//!
//! let agent = HttpAgentClient::new("http://127.0.0.1:8081/api", Duration::from_secs(300))?;
//! let app = create_router(db, Arc::new(agent));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8083").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod testing;
pub mod version;

pub use config::ServerConfig;
pub use dispatch::{DispatchError, RunDispatcher};
