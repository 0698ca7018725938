//! Sticky Notes API server
//! Mission: Serve per-user notes behind bearer-token auth

use anyhow::{Context, Result};
use stickynotes_backend::{
    build_router,
    config::{load_env, Config},
    AppState, Database,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 Sticky Notes API starting");

    let config = Config::from_env().context("Invalid configuration")?;

    let db = Database::open(&config.database_path)?;
    let state = AppState::from_config(db, &config);

    info!(
        "🔐 Authentication initialized (token lifetime {}h)",
        config.token_ttl_hours
    );

    let app = build_router(state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

/// Initialize tracing with an env-overridable filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stickynotes_backend=debug,stickynotes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
