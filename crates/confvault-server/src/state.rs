//! Application state.

use std::sync::Arc;

use confvault_service::ConfigService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The configuration service.
    service: Arc<ConfigService>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: ConfigService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates an AppState sharing an existing service.
    pub fn from_shared(service: Arc<ConfigService>) -> Self {
        Self { service }
    }

    /// Returns a reference to the configuration service.
    pub fn service(&self) -> &ConfigService {
        &self.service
    }
}
