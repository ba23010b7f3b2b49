//! Cleanup sweeper
//!
//! Removes everything written for one failed file. Deletion is best-effort:
//! an absent path is already clean, other errors are logged and swallowed so
//! a cleanup problem never masks the failure that triggered it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::naming::temp_sibling;

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupSweeper;

impl CleanupSweeper {
    pub fn new() -> Self {
        Self
    }

    /// Remove each path and its staging sibling. Idempotent.
    pub async fn cleanup(&self, paths: &[PathBuf]) {
        for path in paths {
            for target in [path.clone(), temp_sibling(path)] {
                log_outcome(&target, tokio::fs::remove_file(&target).await);
            }
        }
    }

    /// Blocking variant for contexts that cannot await, such as `Drop`.
    pub fn cleanup_blocking(&self, paths: &[PathBuf]) {
        for path in paths {
            for target in [path.clone(), temp_sibling(path)] {
                log_outcome(&target, std::fs::remove_file(&target));
            }
        }
    }
}

fn log_outcome(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed upload artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove upload artifact"
        ),
    }
}

/// Tracks the paths written for one file and removes them unless disarmed.
///
/// Paths are registered before their write starts, so a pipeline future
/// dropped mid-write (client disconnect) still cleans up after itself.
/// This relies on [`Storage`](crate::Storage) writes not committing once
/// their future is dropped, which [`LocalStorage`](crate::LocalStorage)
/// guarantees.
#[derive(Debug)]
pub struct ArtifactGuard {
    sweeper: CleanupSweeper,
    paths: Vec<PathBuf>,
    armed: bool,
}

impl ArtifactGuard {
    pub fn new(sweeper: CleanupSweeper) -> Self {
        Self {
            sweeper,
            paths: Vec::new(),
            armed: true,
        }
    }

    pub fn track(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Stop tracking a path this file does not own.
    pub fn forget(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every tracked artifact now.
    pub async fn sweep(mut self) {
        self.armed = false;
        let paths = std::mem::take(&mut self.paths);
        self.sweeper.cleanup(&paths).await;
    }

    /// Keep the artifacts; the file was processed successfully.
    pub fn disarm(mut self) -> Vec<PathBuf> {
        self.armed = false;
        std::mem::take(&mut self.paths)
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if self.armed && !self.paths.is_empty() {
            tracing::warn!(
                artifacts = self.paths.len(),
                "Upload abandoned before completion, removing artifacts"
            );
            self.sweeper.cleanup_blocking(&self.paths);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::write(path, b"data").unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        let keep = dir.path().join("keep.jpg");
        touch(&a);
        touch(&b);
        touch(&keep);
        touch(&temp_sibling(&a));

        let sweeper = CleanupSweeper::new();
        let paths = vec![a.clone(), b.clone()];
        sweeper.cleanup(&paths).await;
        sweeper.cleanup(&paths).await;

        assert!(!a.exists());
        assert!(!b.exists());
        assert!(!temp_sibling(&a).exists());
        assert!(keep.exists());
    }

    #[tokio::test]
    async fn test_cleanup_of_missing_paths_is_noop() {
        let dir = tempdir().unwrap();
        CleanupSweeper::new()
            .cleanup(&[dir.path().join("never-written.png")])
            .await;
        CleanupSweeper::new().cleanup_blocking(&[dir.path().join("never-written.png")]);
    }

    #[tokio::test]
    async fn test_dropped_guard_removes_artifacts() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        touch(&a);

        {
            let mut guard = ArtifactGuard::new(CleanupSweeper::new());
            guard.track(a.clone());
        }

        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_disarmed_guard_keeps_artifacts() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        touch(&a);

        let mut guard = ArtifactGuard::new(CleanupSweeper::new());
        guard.track(a.clone());
        guard.track(a.clone());
        assert_eq!(guard.paths().len(), 1);
        assert_eq!(guard.disarm(), vec![a.clone()]);

        assert!(a.exists());
    }

    #[tokio::test]
    async fn test_forgotten_path_survives_sweep() {
        let dir = tempdir().unwrap();
        let mine = dir.path().join("mine.jpg");
        let theirs = dir.path().join("theirs.jpg");
        touch(&mine);
        touch(&theirs);

        let mut guard = ArtifactGuard::new(CleanupSweeper::new());
        guard.track(mine.clone());
        guard.track(theirs.clone());
        guard.forget(&theirs);
        guard.sweep().await;

        assert!(!mine.exists());
        assert!(theirs.exists());
    }
}
