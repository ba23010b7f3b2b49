//! Filename generation for stored assets.
//!
//! Originals get `{ms-timestamp}-{random}-{sanitized-stem}.{ext}`. Derived
//! renditions are named from the original's stem, so they inherit its
//! uniqueness without further coordination.

use std::path::{Path, PathBuf};

use catalog_media_core::constants::{PROCESSED_PREFIX, THUMBNAIL_PREFIX};
use catalog_media_core::{AssetKind, OutputFormat};
use rand::Rng;

const MAX_STEM_LENGTH: usize = 100;
const FALLBACK_STEM: &str = "image";
const RANDOM_UPPER_BOUND: u32 = 1_000_000_000;

/// Reduce a declared filename's stem to `[A-Za-z0-9-]`.
pub fn sanitize_basename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };

    let sanitized: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_STEM_LENGTH)
        .collect();

    if sanitized.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        sanitized
    }
}

/// Lowercased extension of a declared filename.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Generate a fresh name for an original upload.
pub fn unique_filename(declared: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random: u32 = rand::rng().random_range(0..RANDOM_UPPER_BOUND);
    let stem = sanitize_basename(declared);

    match extension_of(declared) {
        Some(ext) => format!("{}-{}-{}.{}", timestamp, random, stem, ext),
        None => format!("{}-{}-{}", timestamp, random, stem),
    }
}

/// Name of the rendition of `kind` derived from a stored original.
pub fn derived_filename(original: &str, kind: AssetKind, format: OutputFormat) -> String {
    let stem = match original.rfind('.') {
        Some(idx) if idx > 0 => &original[..idx],
        _ => original,
    };

    match kind {
        AssetKind::Original => original.to_string(),
        AssetKind::Processed => format!("{}{}.{}", PROCESSED_PREFIX, stem, format.extension()),
        AssetKind::Thumbnail => format!("{}{}.{}", THUMBNAIL_PREFIX, stem, format.extension()),
    }
}

/// Hidden sibling a write is staged in before being renamed into place.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
