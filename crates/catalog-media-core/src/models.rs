//! Domain models for the upload pipeline.
//!
//! None of these outlive a single request: binding an asset to a catalog
//! record is the caller's job.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{IMAGES_DIR, THUMBNAILS_DIR};
use crate::error::UploadError;

/// One uploaded file as declared by the client.
#[derive(Clone)]
pub struct RawFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl RawFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercased extension of the declared filename, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

impl fmt::Debug for RawFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Ordered files of one upload call.
pub type UploadRequest = Vec<RawFile>;

/// The three kinds of stored asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Original,
    Processed,
    Thumbnail,
}

impl AssetKind {
    /// Storage directory (relative to the upload root) for this kind.
    pub fn directory(self) -> &'static str {
        match self {
            AssetKind::Original | AssetKind::Processed => IMAGES_DIR,
            AssetKind::Thumbnail => THUMBNAILS_DIR,
        }
    }
}

impl FromStr for AssetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(AssetKind::Original),
            "processed" => Ok(AssetKind::Processed),
            "thumbnail" => Ok(AssetKind::Thumbnail),
            _ => Err(anyhow::anyhow!("Invalid asset kind: {}", s)),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Original => write!(f, "original"),
            AssetKind::Processed => write!(f, "processed"),
            AssetKind::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// A raw file persisted under its unique name.
#[derive(Debug, Clone)]
pub struct StoredOriginal {
    pub filename: String,
    pub path: PathBuf,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// A single derived image written to disk.
#[derive(Debug, Clone)]
pub struct Rendition {
    pub filename: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Renditions derived from one stored original.
#[derive(Debug, Clone, Default)]
pub struct DerivedAsset {
    pub processed: Option<Rendition>,
    pub thumbnail: Option<Rendition>,
}

/// Intrinsic properties of a stored original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// Everything produced for one successfully ingested file.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub id: Uuid,
    pub original: StoredOriginal,
    pub derived: DerivedAsset,
    pub metadata: ImageMetadata,
}

#[derive(Debug)]
pub enum ProcessingOutcome {
    Success(Box<ProcessedImage>),
    Failure { filename: String, reason: UploadError },
}

impl ProcessingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success(_))
    }

    pub fn filename(&self) -> &str {
        match self {
            ProcessingOutcome::Success(image) => &image.original.original_filename,
            ProcessingOutcome::Failure { filename, .. } => filename,
        }
    }
}

/// Per-file outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchResult {
    pub outcomes: Vec<ProcessingOutcome>,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

impl BatchResult {
    pub fn from_outcomes(outcomes: Vec<ProcessingOutcome>) -> Self {
        let succeeded_count = outcomes.iter().filter(|o| o.is_success()).count();
        let failed_count = outcomes.len() - succeeded_count;
        Self {
            outcomes,
            succeeded_count,
            failed_count,
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ProcessedImage> {
        self.outcomes.iter().filter_map(|o| match o {
            ProcessingOutcome::Success(image) => Some(image.as_ref()),
            ProcessingOutcome::Failure { .. } => None,
        })
    }

    /// Declared filenames of the files that failed, in input order.
    pub fn failed_filenames(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ProcessingOutcome::Failure { filename, .. } => Some(filename.clone()),
                ProcessingOutcome::Success(_) => None,
            })
            .collect()
    }

    /// A batch fails as a whole only when nothing succeeded.
    pub fn is_failure(&self) -> bool {
        self.succeeded_count == 0
    }
}
