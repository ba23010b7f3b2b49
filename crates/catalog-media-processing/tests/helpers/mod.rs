//! Test helpers: build an upload pipeline over a temporary upload root.
//!
//! Run from workspace root: `cargo test -p catalog-media-processing --test pipeline_test`.

#![allow(dead_code)]

pub mod faults;
pub mod fixtures;

use std::path::Path;
use std::sync::Arc;

use catalog_media_core::{MediaConfig, StorageConfig};
use catalog_media_processing::UploadPipeline;
use catalog_media_storage::{LocalStorage, Storage};
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "https://media.shop.test";

/// Pipeline plus the temporary directory it writes into.
pub struct TestPipeline {
    pub pipeline: UploadPipeline,
    pub config: MediaConfig,
    pub _temp_dir: TempDir,
}

impl TestPipeline {
    pub fn images(&self) -> Vec<String> {
        list(&self.config.storage.images_dir())
    }

    pub fn thumbnails(&self) -> Vec<String> {
        list(&self.config.storage.thumbnails_dir())
    }

    pub fn file_count(&self) -> usize {
        self.images().len() + self.thumbnails().len()
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

pub fn test_config(root: &Path) -> MediaConfig {
    MediaConfig {
        storage: StorageConfig::new(root, TEST_BASE_URL),
        ..MediaConfig::default()
    }
}

pub async fn setup() -> TestPipeline {
    setup_with(|_| {}).await
}

pub async fn setup_with(customize: impl FnOnce(&mut MediaConfig)) -> TestPipeline {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(temp_dir.path());
    customize(&mut config);

    let storage = LocalStorage::new(&config.storage);
    storage.init().await.expect("Failed to init storage");

    TestPipeline {
        pipeline: UploadPipeline::new(&config, Arc::new(storage)),
        config,
        _temp_dir: temp_dir,
    }
}

/// Pipeline over a storage wrapper that misbehaves on thumbnail writes.
pub async fn setup_faulty(fault: faults::Fault) -> TestPipeline {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path());

    let storage = faults::FaultyStorage::new(LocalStorage::new(&config.storage), fault);
    storage.init().await.expect("Failed to init storage");

    TestPipeline {
        pipeline: UploadPipeline::new(&config, Arc::new(storage)),
        config,
        _temp_dir: temp_dir,
    }
}
