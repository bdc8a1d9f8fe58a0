//! Shared application state.

use crate::config::ConfigV1;
use crate::store::EmployeeStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; holds the configuration and the employee store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The employee collection.
    pub store: Arc<dyn EmployeeStore>,
}
