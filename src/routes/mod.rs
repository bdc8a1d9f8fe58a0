//! HTTP route definitions and handlers.
//!
//! Endpoints are grouped into employee CRUD and health checks.

mod employee_routes;
mod health_routes;

pub use employee_routes::DeleteEmployeeResponse;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, traces every request
/// and attaches the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(employee_routes::routes())
        .merge(health_routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
