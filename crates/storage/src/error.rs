use std::path::PathBuf;

/// All errors that can be returned by a ProductStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record matched the (upper-cased) identifier.
    #[error("product not found: {id}")]
    ProductNotFound { id: String },

    /// Every generated identifier collided with an existing record.
    #[error("could not allocate a unique product id after {attempts} attempts")]
    IdAllocation { attempts: usize },

    /// Writing or replacing the backing file failed.
    #[error("failed to write registry file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry could not be serialized to JSON.
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A backend-specific storage error (task join failure, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
