//! Docstore API Server
//!
//! Main entry point for the document store service. Any number of instances
//! may run against the same shared filesystem mount.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docstore_api::{AppState, create_router};
use docstore_shared::AppConfig;

const DEFAULT_LOG_FILTER: &str = "docstore=debug,docstore_core=debug,docstore_api=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.environment);

    // Prepare shared storage
    let state = AppState::from_config(&config).context("Failed to open storage")?;
    state
        .storage
        .ensure_areas()
        .await
        .context("Failed to prepare storage areas")?;

    info!(
        environment = %config.environment,
        mount_path = %state.storage.mount_path.display(),
        blob_dir = %state.storage.blob_root().display(),
        metadata_dir = %state.storage.metadata_root().display(),
        max_file_size = config.storage.max_file_size,
        "Storage ready"
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Human-readable logs, or JSON lines in production.
fn init_tracing(environment: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if environment == "production" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM. In-flight requests finish before exit.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received SIGINT, shutting down"); }
        () = terminate => { info!("Received SIGTERM, shutting down"); }
    }
}
