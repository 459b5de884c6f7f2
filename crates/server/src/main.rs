mod api;
mod config;
mod registry;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{AppState, create_router};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting filemgr server");
    let config_path = std::env::var("FILEMGR_CONFIG").unwrap_or_else(|_| "filemgr.toml".to_string());
    info!(path = %config_path, "loading server config");
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("failed to load server config from {config_path}"))?;

    let state = AppState::from_config(&config).context("failed to initialize application state")?;
    info!(
        root = %state.root.display(),
        storage = state.engine.storage().name(),
        "file manager ready"
    );

    let app = create_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    info!(bind = %config.server.bind, "server is ready, press Ctrl+C to shut down");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, stopping server");
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
