pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod telemetry;
pub mod token;

pub use error::{ApiError, ErrorResponse};
pub use extract::JsonBody;
pub use middleware::{require_token, AuthError, VerifiedClaims};
pub use rest::build_router;
pub use state::AppState;
pub use token::{TokenClaims, TokenError, TokenService};

use std::sync::Arc;
use studycamp_core::{CoreError, CoreResult, DatabaseConfig, StoreBackend, StudyCampConfig};
use studycamp_storage::{DocumentStore, MemoryDocumentStore, MongoDocumentStore, StoreStatus};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Create the document store selected by `config.backend`.
pub async fn build_store(config: &DatabaseConfig) -> CoreResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store (database.backend=memory)");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreBackend::Mongo => {
            let store = MongoDocumentStore::connect(&config.connection_uri(), &config.name).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Boots the StudyCamp API server and serves until a shutdown signal.
pub async fn run_server(config: StudyCampConfig) -> CoreResult<()> {
    let store = build_store(&config.database).await?;

    // The server keeps starting when the ping fails; requests will surface the error.
    match store.status().await {
        Ok(StoreStatus::Healthy) => {
            info!("Pinged your deployment. You successfully connected to the document store!")
        }
        Ok(StoreStatus::Unavailable) => warn!("Document store did not answer the startup ping"),
        Err(e) => warn!("Document store ping failed: {}", e),
    }

    let tokens = TokenService::from_config(&config.auth);
    if !tokens.is_configured() {
        warn!("ACCESS_TOKEN_SECRET is not set; POST /jwt will fail until it is configured");
    }

    let state = AppState::new(store, tokens);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CoreError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("StudyCamp server is running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CoreError::internal(format!("Server error: {}", e)))?;

    info!("StudyCamp server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
    }
}
