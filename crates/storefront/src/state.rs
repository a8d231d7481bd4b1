//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AppConfig;

/// Application state shared across all handlers.
///
/// The single ownership root for the backend client (and with it both
/// response caches): constructed once at startup and cheaply cloneable via
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    backend: BackendClient,
}

impl AppState {
    /// Create a new application state with empty caches.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let backend = BackendClient::new(&config.api);

        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Public URL for a stored product image.
    #[must_use]
    pub fn image_url(&self, name: &str) -> String {
        format!("{}/files/product/{name}", self.inner.config.api.base_url)
    }
}
