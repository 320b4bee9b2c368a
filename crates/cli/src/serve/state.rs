//! Application state shared across request handlers.

use std::sync::Arc;

use verifarm_storage::ProductStore;

/// Application state shared across request handlers.
///
/// Handlers keep no state of their own; every request goes to the store.
pub(crate) struct AppState {
    /// Backing registry.
    pub(crate) store: Arc<dyn ProductStore>,
}

impl AppState {
    pub(crate) fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}
