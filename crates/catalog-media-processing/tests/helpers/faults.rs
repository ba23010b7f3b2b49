//! Storage wrapper for exercising failure and cancellation paths.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use catalog_media_core::AssetKind;
use catalog_media_storage::{LocalStorage, Storage, StorageError, StorageResult};

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Thumbnail writes fail as if the disk were full.
    FailThumbnail,
    /// Thumbnail writes never complete.
    StallThumbnail,
}

pub struct FaultyStorage {
    inner: LocalStorage,
    fault: Fault,
}

impl FaultyStorage {
    pub fn new(inner: LocalStorage, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn init(&self) -> StorageResult<()> {
        self.inner.init().await
    }

    fn path_for(&self, kind: AssetKind, filename: &str) -> StorageResult<PathBuf> {
        self.inner.path_for(kind, filename)
    }

    async fn put(&self, kind: AssetKind, filename: &str, data: Bytes) -> StorageResult<PathBuf> {
        if kind == AssetKind::Thumbnail {
            match self.fault {
                Fault::FailThumbnail => {
                    return Err(StorageError::WriteFailed("No space left on device".to_string()))
                }
                Fault::StallThumbnail => {
                    return std::future::pending::<StorageResult<PathBuf>>().await
                }
            }
        }
        self.inner.put(kind, filename, data).await
    }

    async fn put_new(
        &self,
        kind: AssetKind,
        filename: &str,
        data: Bytes,
    ) -> StorageResult<PathBuf> {
        self.inner.put_new(kind, filename, data).await
    }

    async fn get(&self, kind: AssetKind, filename: &str) -> StorageResult<Vec<u8>> {
        self.inner.get(kind, filename).await
    }

    async fn exists(&self, kind: AssetKind, filename: &str) -> StorageResult<bool> {
        self.inner.exists(kind, filename).await
    }
}
