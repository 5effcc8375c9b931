//! kagent controller server binary
//!
//! Serves the REST API over a SQLite store and forwards session
//! invocations to the agent framework.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kagent_controller::agent::HttpAgentClient;
use kagent_controller::api::create_router;
use kagent_controller::config::ServerConfig;
use kagent_controller::db::DatabaseConnection;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kagent-server", version, about = "kagent control plane API server")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<std::path::PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(long)]
    bind_addr: Option<String>,

    /// SQLite database path, or :memory:
    #[arg(long)]
    database_path: Option<String>,

    /// Base URL of the agent framework API
    #[arg(long)]
    agent_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::load().context("loading configuration")?,
    };
    config.apply_env();
    if let Some(addr) = args.bind_addr {
        config.server.bind_addr = addr;
    }
    if let Some(path) = args.database_path {
        config.database.path = path;
    }
    if let Some(url) = args.agent_url {
        config.agent.url = url;
    }
    config.validate()?;
    let addr = config.bind_addr()?;

    tracing::info!(name = %config.server.name, "starting kagent controller");
    tracing::info!("Database Path: {}", config.database.path);
    tracing::info!("Agent URL: {}", config.agent.url);

    let db = if config.database.is_in_memory() {
        DatabaseConnection::in_memory().await?
    } else {
        let url = config.database_url();
        tracing::info!("Connecting to database: {}", url);
        DatabaseConnection::with_max_connections(&url, config.database.max_connections).await?
    };

    tracing::info!("Running database migrations");
    db.run_migrations().await?;
    db.health_check().await?;

    let agent = HttpAgentClient::new(&config.agent.url, config.agent.timeout())
        .context("building agent client")?;
    let app = create_router(db.clone(), Arc::new(agent));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("kagent controller shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received CTRL-C signal, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM signal, shutting down"),
    }
}
