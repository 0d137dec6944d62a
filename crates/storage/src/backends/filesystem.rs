//! Local filesystem asset backend.
//!
//! Assets live directly under the storage root; names are flat (no
//! directories).

use crate::error::{StorageError, StorageResult};
use crate::traits::{AssetStore, ByteStream};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Filesystem-backed asset store.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create the backend, creating the root directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for an asset name, validated off the async runtime.
    async fn asset_path(&self, name: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || Self::asset_path_sync(&root, &name))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    /// Map an asset name to a path inside the root.
    ///
    /// The name must be a single normal path component. An existing entry
    /// (including a symlink) must resolve inside the root.
    fn asset_path_sync(root: &Path, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidKey(format!(
                "path traversal not allowed: {name}"
            )));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(StorageError::InvalidKey(format!(
                    "asset name must be a single file name: {name}"
                )));
            }
        }

        let path = root.join(name);

        match std::fs::symlink_metadata(&path) {
            Ok(meta) => {
                let root_canonical = root.canonicalize()?;
                let canonical = path.canonicalize().map_err(|e| {
                    if meta.file_type().is_symlink() {
                        StorageError::InvalidKey(format!(
                            "symlink target missing or invalid: {name}"
                        ))
                    } else {
                        StorageError::Io(e)
                    }
                })?;

                if !canonical.starts_with(&root_canonical) {
                    return Err(StorageError::InvalidKey(format!(
                        "resolved path escapes storage root: {name}"
                    )));
                }
                Ok(path)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(path),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn not_found_or_io(name: &str, err: std::io::Error) -> StorageError {
        if err.kind() == ErrorKind::NotFound {
            StorageError::NotFound(name.to_string())
        } else {
            StorageError::Io(err)
        }
    }
}

#[async_trait]
impl AssetStore for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.asset_path(name).await?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let path = self.asset_path(name).await?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| Self::not_found_or_io(name, e))?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, name: &str, data: Bytes) -> StorageResult<()> {
        let path = self.asset_path(name).await?;

        // Unique temp name so concurrent writers to one name never share a file.
        let temp_path = self.root.join(format!(".{name}.tmp.{}", Uuid::new_v4()));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(err));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get_stream(&self, name: &str) -> StorageResult<ByteStream> {
        use tokio::io::AsyncReadExt;

        let path = self.resolve(name).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| Self::not_found_or_io(name, e))?;

        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(Box::pin(stream))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.root).await?;
        if !meta.is_dir() {
            return Err(StorageError::Config(format!(
                "storage root is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}
