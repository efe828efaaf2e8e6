//! Reviewbox API Server
//!
//! Main entry point for the Reviewbox backend service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reviewbox_api::{AppState, create_router};
use reviewbox_core::storage::{ImageStorage, StorageConfig};
use reviewbox_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reviewbox=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Select the image storage backend; misconfiguration stops startup here
    let storage_config =
        StorageConfig::from_app_config(&config).context("Invalid storage configuration")?;
    let storage =
        ImageStorage::from_config(storage_config).context("Failed to initialize image storage")?;
    info!(
        backend = storage.provider_name(),
        max_upload_bytes = config.server.max_upload_bytes,
        "Image storage configured"
    );

    // Create application state and router
    let state = AppState::new(storage, config.server.max_upload_bytes);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
