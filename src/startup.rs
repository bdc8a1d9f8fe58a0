//! Application startup and server initialization.
//!
//! Creates the employee store, builds the router and serves it until
//! Ctrl-C or SIGTERM is received.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Builds the shared state for the given configuration.
///
/// # Errors
///
/// Returns an error if the configured store cannot be reached or initialised.
pub async fn build_state(config: Arc<ConfigV1>) -> Result<AppState, Box<dyn std::error::Error>> {
    let store = create_store(&config.store).await?;
    Ok(AppState { config, store })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the store cannot be created, the server fails to bind
/// to the configured address, or it encounters a runtime error while serving.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone()).await?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
