//! PDF Flipbook Backend
//!
//! Accepts PDF uploads, rasterizes each page to a PNG image and serves an
//! ordered list of page URLs for client-side flipbook rendering. Page
//! images are stored on local disk or in an S3-compatible object store.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flipbook_server::config::{Config, StorageBackend};
use flipbook_server::routes;
use flipbook_server::state::AppState;
use flipbook_server::storage::{LocalPageStore, PageStore, S3PageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flipbook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Flipbook Server v{}", env!("CARGO_PKG_VERSION"));

    // Select the storage backend once; handlers only see the trait.
    let store: Arc<dyn PageStore> = match (config.storage.backend, &config.storage.s3) {
        (StorageBackend::S3, Some(s3)) => {
            tracing::info!("S3 endpoint: {}", s3.endpoint);
            tracing::info!("S3 bucket: {}", s3.bucket);
            Arc::new(S3PageStore::new(s3).await?)
        }
        _ => {
            tracing::info!(
                "Local storage root: {}",
                config.storage.uploads_dir.display()
            );
            tokio::fs::create_dir_all(&config.storage.uploads_dir).await?;
            Arc::new(LocalPageStore::new(
                config.storage.uploads_dir.clone(),
                &config.server.public_url,
            ))
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let app_state = AppState::new(config, store);
    let app = routes::app(app_state);

    tracing::info!("Flipbook Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
