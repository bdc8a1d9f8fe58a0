//! Health check endpoints.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::warn;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Returns 200 OK when the service is up and its store answers a ping,
/// 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("Health check failed for {} store: {}", state.store.get_type(), e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
        }
    }
}
