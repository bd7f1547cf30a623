//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::ObsCoreRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ObsCoreRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ObsCoreRepository>) -> Self {
        Self { repository }
    }
}
