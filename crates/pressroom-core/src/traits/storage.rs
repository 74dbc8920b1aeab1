//! Storage provider trait for pluggable file storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for file storage backends.
///
/// All paths are relative to the provider's root; the asset pipeline never
/// touches absolute filesystem paths directly. The trait is defined here in
/// `pressroom-core` and implemented in `pressroom-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file at the given path, creating parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file at the given path. Deleting a missing file is not an
    /// error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Copy a file from one path to another within this provider.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Move (rename) a file from one path to another within this provider.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;
}
