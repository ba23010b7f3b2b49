use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use catalog_media_core::{AssetKind, StorageConfig};
use tokio::fs;

use crate::naming::temp_sibling;
use crate::traits::{Storage, StorageError, StorageResult};

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    images_dir: PathBuf,
    thumbnails_dir: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the configured upload directory.
    ///
    /// No filesystem access happens here; call [`Storage::init`] once at startup.
    pub fn new(config: &StorageConfig) -> Self {
        LocalStorage {
            images_dir: config.images_dir(),
            thumbnails_dir: config.thumbnails_dir(),
        }
    }

    fn dir_for(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Original | AssetKind::Processed => &self.images_dir,
            AssetKind::Thumbnail => &self.thumbnails_dir,
        }
    }

    /// Convert a filename to a filesystem path with security validation
    ///
    /// Filenames must be a single component so they cannot escape the
    /// storage directory.
    fn key_to_path(&self, kind: AssetKind, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
            || filename.starts_with('.')
        {
            return Err(StorageError::InvalidKey(format!(
                "Filename contains invalid characters: {}",
                filename
            )));
        }

        Ok(self.dir_for(kind).join(filename))
    }

    /// Stage `data` in a hidden sibling, fsync, then rename over `path`.
    ///
    /// Runs as one blocking task. If this future is dropped while the task is
    /// in flight, the task discards its output instead of committing it.
    async fn write_atomic(&self, path: &Path, data: Bytes, reserve: bool) -> StorageResult<()> {
        let abandoned = AbandonOnDrop::default();
        let flag = abandoned.0.clone();
        let target = path.to_path_buf();

        tokio::task::spawn_blocking(move || write_staged(&target, &data, reserve, &flag))
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Write task failed: {}", e)))?
    }
}

/// Marks an in-flight write as abandoned when the awaiting future goes away.
#[derive(Default)]
struct AbandonOnDrop(Arc<Mutex<bool>>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Blocking half of [`LocalStorage::write_atomic`].
///
/// With `reserve`, the final name is claimed with `create_new` first so an
/// existing file is never replaced. The rename happens under the `abandoned`
/// lock: once the flag is set, nothing new appears at `path`.
fn write_staged(
    path: &Path,
    data: &[u8],
    reserve: bool,
    abandoned: &Mutex<bool>,
) -> StorageResult<()> {
    if reserve {
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return Err(StorageError::AlreadyExists(name));
            }
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    let tmp = temp_sibling(path);
    let staged = std::fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });

    let committed = staged.and_then(|()| {
        let abandoned = abandoned.lock().unwrap_or_else(PoisonError::into_inner);
        if *abandoned {
            return Ok(false);
        }
        std::fs::rename(&tmp, path).map(|()| true)
    });

    let error = match committed {
        Ok(true) => return Ok(()),
        Ok(false) => format!("Write to {} abandoned", path.display()),
        Err(e) => format!("Failed to write file {}: {}", path.display(), e),
    };

    discard(&tmp);
    if reserve {
        discard(path);
    }
    Err(StorageError::WriteFailed(error))
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove staged file"
            );
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn init(&self) -> StorageResult<()> {
        for dir in [&self.images_dir, &self.thumbnails_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        tracing::info!(
            images_dir = %self.images_dir.display(),
            thumbnails_dir = %self.thumbnails_dir.display(),
            "Local storage initialized"
        );

        Ok(())
    }

    fn path_for(&self, kind: AssetKind, filename: &str) -> StorageResult<PathBuf> {
        self.key_to_path(kind, filename)
    }

    async fn put(&self, kind: AssetKind, filename: &str, data: Bytes) -> StorageResult<PathBuf> {
        let path = self.key_to_path(kind, filename)?;
        let start = std::time::Instant::now();

        let size_bytes = data.len();
        self.write_atomic(&path, data, false).await?;

        tracing::info!(
            path = %path.display(),
            kind = %kind,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(path)
    }

    async fn put_new(
        &self,
        kind: AssetKind,
        filename: &str,
        data: Bytes,
    ) -> StorageResult<PathBuf> {
        let path = self.key_to_path(kind, filename)?;
        let start = std::time::Instant::now();

        let size_bytes = data.len();
        self.write_atomic(&path, data, true).await?;

        tracing::info!(
            path = %path.display(),
            kind = %kind,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(path)
    }

    async fn get(&self, kind: AssetKind, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(kind, filename)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, kind: AssetKind, filename: &str) -> StorageResult<bool> {
        let path = self.key_to_path(kind, filename)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_in(dir: &Path) -> LocalStorage {
        let storage = LocalStorage::new(&StorageConfig::new(dir, "http://localhost:3000"));
        storage.init().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_init_creates_directories_idempotently() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        let storage = LocalStorage::new(&StorageConfig::new(&root, "http://localhost:3000"));

        storage.init().await.unwrap();
        storage.init().await.unwrap();

        assert!(root.join("images").is_dir());
        assert!(root.join("thumbnails").is_dir());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let path = storage
            .put(AssetKind::Thumbnail, "thumb-a.jpg", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("thumbnails").join("thumb-a.jpg"));
        assert_eq!(
            storage.get(AssetKind::Thumbnail, "thumb-a.jpg").await.unwrap(),
            b"abc"
        );
        assert!(!temp_sibling(&path).exists());
    }

    #[tokio::test]
    async fn test_put_new_refuses_existing_name() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        storage
            .put_new(AssetKind::Original, "a.png", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let result = storage
            .put_new(AssetKind::Original, "a.png", Bytes::from_static(b"second"))
            .await;

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(
            storage.get(AssetKind::Original, "a.png").await.unwrap(),
            b"first"
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_file() {
        let dir = tempdir().unwrap();
        // init never ran, so the images directory is missing and the write fails
        let storage = LocalStorage::new(&StorageConfig::new(dir.path(), "http://localhost:3000"));

        let result = storage
            .put(AssetKind::Original, "a.png", Bytes::from_static(b"x"))
            .await;

        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert!(!storage.exists(AssetKind::Original, "a.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_abandoned_write_is_not_committed() {
        let dir = tempdir().unwrap();
        storage_in(dir.path()).await;
        let path = dir.path().join("images").join("a.png");

        let result = write_staged(&path, b"late", true, &Mutex::new(true));

        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert!(!path.exists());
        assert!(!temp_sibling(&path).exists());
    }

    #[tokio::test]
    async fn test_staged_write_commits_when_awaited() {
        let dir = tempdir().unwrap();
        storage_in(dir.path()).await;
        let path = dir.path().join("images").join("a.png");

        write_staged(&path, b"data", true, &Mutex::new(false)).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        assert!(!temp_sibling(&path).exists());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage.get(AssetKind::Original, "../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.path_for(AssetKind::Thumbnail, "sub/dir.png");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.path_for(AssetKind::Original, ".hidden.tmp");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage.get(AssetKind::Original, "missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
