use dotenvy::dotenv;
use needs_tracker::{
    api::{AppState, build_router},
    config::{ServerConfig, database, starter},
    errors::Result,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Server settings
    let config = ServerConfig::from_env()
        .inspect_err(|e| error!("Invalid server configuration: {}", e))?;
    info!(bind_addr = %config.bind_addr, cors = config.enable_cors, "Configuration loaded");

    // 4. Database
    database::ensure_sqlite_dir(&config.database_url)?;
    let db = database::create_connection(&config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Starter set for the wizard
    let starter = starter::load_or_default(&config.starter_config)?;

    let state = Arc::new(AppState { db, starter });
    let app = build_router(state, config.enable_cors);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
