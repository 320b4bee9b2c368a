use async_trait::async_trait;

use crate::error::StorageError;
use crate::id::normalize_id;
use crate::record::{NewProduct, ProductRecord, Registry};

/// What [`ProductStore::bootstrap`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The registry was empty and the demo products were written.
    Seeded { count: usize },
    /// The registry already held products; nothing was written.
    Existing { count: usize },
}

impl BootstrapOutcome {
    pub fn count(self) -> usize {
        match self {
            BootstrapOutcome::Seeded { count } | BootstrapOutcome::Existing { count } => count,
        }
    }
}

/// The storage trait for the product registry.
///
/// A `ProductStore` owns the full collection of product records as a single
/// [`Registry`] container. Every mutation loads the whole container, modifies
/// it in memory and writes it back.
///
/// ## Read failures
///
/// `load` never fails: an unreadable or unparseable backing store is treated
/// as an empty registry. Implementations must log the cause.
///
/// ## Writer serialization
///
/// `bootstrap` and `register_product` perform load-modify-save cycles.
/// Implementations must serialize these cycles so that concurrent callers in
/// the same process never lose each other's writes.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    /// Read the full container, substituting an empty one on any failure.
    async fn load(&self) -> Registry;

    /// Replace the stored container with `registry`.
    async fn save(&self, registry: &Registry) -> Result<(), StorageError>;

    /// Create the backing store if absent and seed it with the demo products
    /// when it holds no records.
    async fn bootstrap(&self) -> Result<BootstrapOutcome, StorageError>;

    /// Append a newly registered product built from `draft`.
    ///
    /// The identifier is generated here and checked against the current
    /// collection; the caller is responsible for validating `draft`.
    async fn register_product(&self, draft: NewProduct) -> Result<ProductRecord, StorageError>;

    // ── Queries ───────────────────────────────────────────────────────────────

    /// All records in stored order.
    async fn list_products(&self) -> Vec<ProductRecord> {
        self.load().await.products
    }

    /// Case-insensitive lookup by identifier.
    ///
    /// Returns `Err(StorageError::ProductNotFound)` if no record matches.
    async fn get_product(&self, id: &str) -> Result<ProductRecord, StorageError> {
        let wanted = normalize_id(id);
        self.load()
            .await
            .products
            .into_iter()
            .find(|p| p.id == wanted)
            .ok_or(StorageError::ProductNotFound { id: wanted })
    }
}
