//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The storage facade is constructed once at
/// process start and owned here for the process lifetime; no handler ever
/// reaches for an ambient global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    storage: Storage,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, storage: Storage) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, storage }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage facade.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }
}
