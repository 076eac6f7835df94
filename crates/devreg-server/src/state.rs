//! Application state shared by every handler.
//!
//! [`AppState`] holds the store backend behind an `Arc`. The backend owns no
//! open connection; each handler acquires its own through
//! [`DeviceService::acquire`](crate::service::DeviceService::acquire), so no
//! lock is needed here.

use std::sync::Arc;

use devreg_storage::KvBackend;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Backend that hands out per-request store connections.
    pub store: Arc<dyn KvBackend>,
}

impl AppState {
    /// Creates state for the store named by `config.store_url`.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store = devreg_storage::open_backend(&config.store_url)?;
        Ok(AppState { store })
    }

    /// Wraps an existing backend.
    pub fn with_backend(store: Arc<dyn KvBackend>) -> Self {
        AppState { store }
    }
}
