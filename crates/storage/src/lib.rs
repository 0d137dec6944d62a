//! Asset storage abstraction and backends for the storefront.
//!
//! Uploaded product images are stored under a logical name chosen by the
//! asset namer and served back by name. The only backend is the local
//! filesystem.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::{AssetStore, ByteStream};

use std::sync::Arc;
use storefront_core::config::StorageConfig;

/// Create an asset store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn AssetStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            if path.as_os_str().is_empty() {
                return Err(StorageError::Config(
                    "filesystem storage requires a non-empty path".to_string(),
                ));
            }
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
