//! # Tasklist Web Server
//!
//! Loads configuration, prepares the database and serves the task tracker
//! until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tasklist \
//! SESSION_SECRET=$(openssl rand -hex 32) \
//!     cargo run -p tasklist-web
//! ```

use anyhow::Context;
use tasklist_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tasklist_web::{
    app::{build_router, AppState},
    config::Config,
    logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(config.log.json);

    tracing::info!(
        "Tasklist web server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await
    .context("Failed to connect to the database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!(
        address = %bind_address,
        production = config.api.production,
        "Server listening"
    );

    let app = build_router(AppState::new(pool.clone(), config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, draining connections..."),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
