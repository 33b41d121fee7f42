//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pdf::PdfRasterizer;
use crate::storage::PageStore;

/// Shared application state
///
/// The storage backend is selected once at startup and injected here as a
/// trait object; handlers never branch on the concrete backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<dyn PageStore>,
    rasterizer: PdfRasterizer,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PageStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                rasterizer: PdfRasterizer::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the page store
    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.inner.store
    }

    /// Get the rasterizer
    pub fn rasterizer(&self) -> &PdfRasterizer {
        &self.inner.rasterizer
    }

    /// Shareable retrieval link for a document.
    pub fn share_url(&self, doc_id: &str) -> String {
        format!(
            "{}/flipbook/{}",
            self.inner.config.server.public_url.trim_end_matches('/'),
            doc_id
        )
    }
}
