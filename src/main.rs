//! Property Image Cache - read-through cache of property image listings
//!
//! Serves image lists from a persisted TTL cache and backfills misses from the
//! listing API in paced batches.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_image_cache::api::{create_router, AppState};
use property_image_cache::cache::{CacheStore, FileBlobStorage};
use property_image_cache::loader::{BatchLoader, HttpImageSource};
use property_image_cache::Config;

/// Main entry point for the image cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the persisted cache, sweeping expired entries
/// 4. Build the listing client and batch loader
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_image_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting property image cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_dir={}, ttl={}s, batch_size={}, inter_batch_delay={}ms, port={}",
        config.cache_dir.display(),
        config.cache_ttl,
        config.batch_size,
        config.inter_batch_delay_ms,
        config.server_port
    );

    let storage = FileBlobStorage::new(&config.cache_dir)
        .with_context(|| format!("creating cache dir {}", config.cache_dir.display()))?;
    let store = Arc::new(CacheStore::open(Arc::new(storage), config.ttl()));

    let source = HttpImageSource::new(
        config.listing_base_url.clone(),
        Duration::from_secs(config.fetch_timeout),
    )
    .context("building listing client")?;
    let loader = BatchLoader::new(store, Arc::new(source), config.image_layout());
    info!("Listing source: {}", config.listing_base_url);

    let app = create_router(AppState::from_config(loader, &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
