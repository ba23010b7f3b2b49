//! Storage allocator: persists a raw upload under a fresh unique name.

use std::sync::Arc;

use catalog_media_core::{AssetKind, RawFile, StoredOriginal};

use crate::cleanup::ArtifactGuard;
use crate::naming::unique_filename;
use crate::traits::{Storage, StorageError, StorageResult};

/// Name clashes need the same millisecond and the same random draw, so a
/// second attempt practically always succeeds.
const MAX_NAME_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct StorageAllocator {
    storage: Arc<dyn Storage>,
}

impl StorageAllocator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Write the file's bytes as a new original.
    ///
    /// The target path is registered with `guard` before the write begins.
    /// A name already held by another upload is never overwritten; a fresh
    /// name is drawn instead.
    pub async fn allocate(
        &self,
        file: &RawFile,
        guard: &mut ArtifactGuard,
    ) -> StorageResult<StoredOriginal> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let filename = unique_filename(&file.filename);
            let path = self.storage.path_for(AssetKind::Original, &filename)?;
            guard.track(path.clone());

            match self
                .storage
                .put_new(AssetKind::Original, &filename, file.data.clone())
                .await
            {
                Ok(path) => {
                    return Ok(StoredOriginal {
                        filename,
                        path,
                        original_filename: file.filename.clone(),
                        content_type: file.content_type.clone(),
                        size_bytes: file.size() as u64,
                    });
                }
                Err(StorageError::AlreadyExists(_)) => {
                    guard.forget(&path);
                    tracing::debug!(
                        filename = %filename,
                        attempt,
                        "Generated filename already taken, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::WriteFailed(format!(
            "Could not allocate a unique name for {} after {} attempts",
            file.filename, MAX_NAME_ATTEMPTS
        )))
    }
}
