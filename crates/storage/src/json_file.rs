//! `ProductStore` backed by a single pretty-printed JSON file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::id::generate_unique_id;
use crate::record::{NewProduct, ProductRecord, Registry};
use crate::seed::demo_products;
use crate::traits::{BootstrapOutcome, ProductStore};

/// A registry stored as `{ "products": [...] }` in one file.
///
/// Writes go to a temporary file in the same directory which then replaces
/// the target, so readers never observe a half-written registry. Mutating
/// cycles hold `writer`; a second process writing the same file is not
/// coordinated with and the last writer wins.
pub struct JsonFileStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize and replace the file. Callers must hold `writer`.
    async fn write_registry(&self, registry: &Registry) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(registry)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| StorageError::Backend(format!("registry write task failed: {e}")))?
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let write_err = |source: io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[async_trait]
impl ProductStore for JsonFileStore {
    async fn load(&self) -> Registry {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "registry file does not exist");
                return Registry::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read registry file, treating it as empty"
                );
                return Registry::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "registry file is not valid JSON, treating it as empty"
                );
                Registry::default()
            }
        }
    }

    async fn save(&self, registry: &Registry) -> Result<(), StorageError> {
        let _guard = self.writer.lock().await;
        self.write_registry(registry).await
    }

    async fn bootstrap(&self) -> Result<BootstrapOutcome, StorageError> {
        let _guard = self.writer.lock().await;

        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            tracing::info!(path = %self.path.display(), "creating empty registry file");
            self.write_registry(&Registry::default()).await?;
        }

        let mut registry = self.load().await;
        if !registry.products.is_empty() {
            return Ok(BootstrapOutcome::Existing {
                count: registry.products.len(),
            });
        }

        registry.products = demo_products();
        self.write_registry(&registry).await?;
        tracing::info!(
            count = registry.products.len(),
            "seeded registry with demo products"
        );
        Ok(BootstrapOutcome::Seeded {
            count: registry.products.len(),
        })
    }

    async fn register_product(&self, draft: NewProduct) -> Result<ProductRecord, StorageError> {
        let _guard = self.writer.lock().await;

        let mut registry = self.load().await;
        let id = generate_unique_id(&mut rand::thread_rng(), &registry.products)?;
        let record = ProductRecord::registered(id, draft);
        registry.products.push(record.clone());
        self.write_registry(&registry).await?;

        tracing::info!(id = %record.id, name = %record.name, "registered product");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::is_valid_id;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("products.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.products.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().await.products.is_empty());
    }

    #[tokio::test]
    async fn bootstrap_creates_and_seeds_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let outcome = store.bootstrap().await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Seeded { count: 2 });

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["products"][0]["id"], "AGT001");
        assert_eq!(parsed["products"][1]["id"], "AGT002");
        // pretty-printed
        assert!(raw.contains("\n  \"products\""));
    }

    #[tokio::test]
    async fn bootstrap_keeps_existing_products() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let registry = Registry {
            products: vec![ProductRecord::registered(
                "AGTZZZZZZ".to_string(),
                NewProduct::new("Kale", "Hill Farm", "2024-02-01"),
            )],
        };
        store.save(&registry).await.unwrap();

        let outcome = store.bootstrap().await.unwrap();
        assert_eq!(outcome, BootstrapOutcome::Existing { count: 1 });
        assert_eq!(store.load().await, registry);
    }

    #[tokio::test]
    async fn register_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.bootstrap().await.unwrap();

        let created = store
            .register_product(NewProduct::new("Kale", "Hill Farm", "2024-02-01"))
            .await
            .unwrap();
        assert!(is_valid_id(&created.id));

        let reopened = store_in(&dir);
        let products = reopened.list_products().await;
        assert_eq!(products.len(), 3);
        assert_eq!(products.last(), Some(&created));
        assert_eq!(reopened.get_product(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn register_keeps_partial_records_and_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let existing = serde_json::json!({
            "products": [
                {
                    "id": "AGT001",
                    "name": "Organic Tomatoes",
                    "farm": "Green Valley Farms",
                    "harvestDate": "2024-01-15",
                    "currentLocation": "Distribution Center",
                    "status": "Fresh",
                    "notes": "keep me",
                    "timeline": [{
                        "stage": "Harvesting",
                        "location": "Green Valley Farms",
                        "date": "2024-01-15",
                        "temperature": "22°C",
                        "status": "completed",
                        "humidity": "60%"
                    }]
                },
                {
                    "id": "AGT002",
                    "name": "Fresh Carrots",
                    "farm": "Sunshine Farms",
                    "harvestDate": "2024-01-10",
                    "status": "Good",
                    "timeline": []
                }
            ]
        });
        std::fs::write(store.path(), existing.to_string()).unwrap();

        assert_eq!(store.list_products().await.len(), 2);
        store
            .register_product(NewProduct::new("Kale", "Hill Farm", "2024-02-01"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let on_disk: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let products = on_disk["products"].as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["notes"], "keep me");
        assert_eq!(products[0]["timeline"][0]["humidity"], "60%");
        assert_eq!(products[1]["id"], "AGT002");
        assert_eq!(products[1]["name"], "Fresh Carrots");
        assert_eq!(products[2]["name"], "Kale");
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/data/products.json"));
        store.save(&Registry::default()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn save_leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.bootstrap().await.unwrap();
        store
            .register_product(NewProduct::new("Kale", "Hill Farm", "2024-02-01"))
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
