//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::SchemaService;

/// Shared application state passed to all handlers.
///
/// Built once at the application root; there is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    /// Schema service instance handling all operations
    pub service: Arc<SchemaService>,
}

impl AppState {
    /// Create a new application state with the given service.
    pub fn new(service: Arc<SchemaService>) -> Self {
        Self { service }
    }
}
