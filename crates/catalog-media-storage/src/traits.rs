//! Storage abstraction trait
//!
//! Assets are addressed by kind and filename; the backend decides where they
//! live. Writes are all-or-nothing: a failed write never leaves a partial file
//! under the final name.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use catalog_media_core::{AssetKind, UploadError};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid filename: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        UploadError::Io(err.to_string())
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Create the storage directories. Idempotent; must run before the first write.
    async fn init(&self) -> StorageResult<()>;

    /// Resolve where an asset lives, rejecting filenames that would escape its directory.
    fn path_for(&self, kind: AssetKind, filename: &str) -> StorageResult<PathBuf>;

    /// Write an asset, replacing any existing file of the same name.
    async fn put(&self, kind: AssetKind, filename: &str, data: Bytes) -> StorageResult<PathBuf>;

    /// Write an asset under a name no other writer holds.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when the name is taken; the
    /// existing file is left untouched.
    async fn put_new(&self, kind: AssetKind, filename: &str, data: Bytes)
        -> StorageResult<PathBuf>;

    async fn get(&self, kind: AssetKind, filename: &str) -> StorageResult<Vec<u8>>;

    async fn exists(&self, kind: AssetKind, filename: &str) -> StorageResult<bool>;
}
