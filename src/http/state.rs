//! Application state for the HTTP server.

use crate::db::repository::FullRepository;
use crate::services::sessions::SessionStore;
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// In-memory cookie session store
    pub sessions: SessionStore,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            sessions: SessionStore::new(),
        }
    }
}
