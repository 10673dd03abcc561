// ABOUTME: Server bootstrap for Tasklist
// ABOUTME: Wires configuration, logging, the item database, and the HTTP router together

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tasklist_storage::{Database, StorageResult};

pub mod config;


use config::{Config, DatabaseLocation};

/// Install the global tracing subscriber. `RUST_LOG` wins over the default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

pub async fn open_database(location: &DatabaseLocation) -> StorageResult<Database> {
    match location {
        DatabaseLocation::File(path) => Database::open(path).await,
        DatabaseLocation::InMemory => Database::open_in_memory().await,
    }
}

/// The application router with request tracing
pub fn build_app(db: Database) -> Router {
    tasklist_api::create_router(db).layer(TraceLayer::new_for_http())
}

/// Open the database, serve until a shutdown signal, then close the database
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db = open_database(&config.database)
        .await
        .context("Failed to open database")?;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, build_app(db.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    served.context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
