//! Binary entrypoint for the device registry HTTP server.
//!
//! Configuration is read from `DEVREG_*` environment variables; see
//! [`ServerConfig`](devreg_server::config::ServerConfig).

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devreg_server::config::ServerConfig;
use devreg_server::router::build_router;
use devreg_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::new(&config).context("failed to initialize application state")?;
    tracing::info!(store = state.store.name(), url = %config.store_url, "store backend ready");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("device registry listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
