mod error;
mod id;
mod json_file;
mod record;
mod seed;
mod traits;

pub mod conformance;

pub use error::StorageError;
pub use id::{generate_id, generate_unique_id, is_valid_id, normalize_id, ID_PREFIX, ID_SUFFIX_LEN};
pub use json_file::JsonFileStore;
pub use record::{
    NewProduct, ProductRecord, Registry, Stage, StageStatus, TimelineEntry, DEFAULT_LOCATION,
    DEFAULT_STATUS, PENDING, TEMPERATURE_NOT_AVAILABLE,
};
pub use seed::demo_products;
pub use traits::{BootstrapOutcome, ProductStore};
