use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movies_api::config::{store_config_from_env, Cli, ServerConfig};
use movies_api::router::build_app_router;
use movies_api::server::{bind_listener, shutdown_signal};
use movies_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "movies_api=debug,movies_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let cli = Cli::parse();
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let store_config = store_config_from_env().context("Invalid store configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = %cli.backend,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store = movies_db::open_store(cli.backend, &store_config)
        .await
        .with_context(|| format!("Failed to open the {} backend", cli.backend))?;

    // --- Router ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Server ---
    let listener = bind_listener(&config.host, config.port)
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
