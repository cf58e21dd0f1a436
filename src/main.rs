//! Explorer Cache - a read-through caching layer for a blockchain API
//!
//! Binary entry point: wires the store connector, cache, upstream client,
//! and HTTP server together.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod store;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::Cache;
use config::Config;
use store::{KeyValueStore, RedisStore};
use upstream::UpstreamClient;

/// Main entry point for the explorer cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the store; a failure degrades to uncached serving
/// 4. Assemble cache, upstream client, and router
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, drain the server and disconnect the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explorer_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Explorer Cache");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: store={}, upstream={}, default_ttl={}s, prefix={:?}, port={}",
        config.store_url,
        config.upstream_url,
        config.default_ttl,
        config.key_prefix,
        config.server_port
    );

    // Single store connection shared across all in-flight requests.
    let store = Arc::new(RedisStore::new(config.store_url.clone()));
    if let Err(err) = store.connect().await {
        // The cache is fail-open: the server starts anyway and every
        // request degrades to a miss until the store comes back.
        warn!(error = %err, "store unreachable at startup, serving uncached");
    }

    let cache = Cache::from_config(store.clone(), &config);
    let upstream = UpstreamClient::new(config.upstream_url.clone());
    let state = AppState::new(cache, upstream);

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release the store socket deterministically on the way out.
    if let Err(err) = store.disconnect().await {
        warn!(error = %err, "store disconnect failed during shutdown");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
