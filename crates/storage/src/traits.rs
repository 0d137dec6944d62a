//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;

/// A boxed stream of bytes for streaming reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Store for uploaded product images, addressed by logical asset name.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Check if an asset exists.
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Resolve a logical asset name to its location.
    ///
    /// Returns `StorageError::NotFound` when no asset with that name exists.
    async fn resolve(&self, name: &str) -> StorageResult<PathBuf>;

    /// Store an asset atomically, replacing any previous content.
    async fn put(&self, name: &str, data: Bytes) -> StorageResult<()>;

    /// Get an asset as a byte stream.
    async fn get_stream(&self, name: &str) -> StorageResult<ByteStream>;

    /// Get the name of this storage backend, used for metrics and logging.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is usable. Called at startup and by the health endpoint.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
