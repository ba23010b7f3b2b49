//! Configuration module
//!
//! Explicit configuration for the upload pipeline: where assets live, what
//! the ingress validator accepts, and how derivatives are produced. Every
//! field has a default and can be overridden from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::*;
use crate::format::OutputFormat;

/// Storage location and public URL root.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub root_dir: PathBuf,
    pub base_url: String,
}

impl StorageConfig {
    pub fn new(root_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Directory holding originals and processed renditions.
    pub fn images_dir(&self) -> PathBuf {
        self.root_dir.join(IMAGES_DIR)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.root_dir.join(THUMBNAILS_DIR)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR, DEFAULT_BASE_URL)
    }
}

/// Ingress limits checked before any disk I/O.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_files_per_request: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files_per_request: DEFAULT_MAX_FILES_PER_REQUEST,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Options for the derivative generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivativeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Encoder quality for the processed rendition (1-100)
    pub quality: u8,
    pub output_format: OutputFormat,
    pub make_thumbnail: bool,
    /// Edge length of the square thumbnail
    pub thumbnail_size: u32,
    pub thumbnail_quality: u8,
}

impl Default for DerivativeOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            output_format: OutputFormat::Jpeg,
            make_thumbnail: true,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, Default)]
pub struct MediaConfig {
    pub storage: StorageConfig,
    pub upload: UploadLimits,
    pub derivatives: DerivativeOptions,
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_list(value: Option<String>, default: &[&str]) -> Vec<String> {
    match value {
        Some(v) => v
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl MediaConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_file_size_mb = parse_or(lookup("MAX_FILE_SIZE_MB"), DEFAULT_MAX_FILE_SIZE_MB);

        let output_format = match lookup("IMAGE_OUTPUT_FORMAT") {
            Some(raw) => raw.parse::<OutputFormat>()?,
            None => OutputFormat::Jpeg,
        };

        let config = MediaConfig {
            storage: StorageConfig {
                root_dir: lookup("UPLOAD_DIR")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
                base_url: lookup("BASE_URL")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            upload: UploadLimits {
                max_file_size_bytes: max_file_size_mb * 1024 * 1024,
                max_files_per_request: parse_or(
                    lookup("MAX_FILES_PER_REQUEST"),
                    DEFAULT_MAX_FILES_PER_REQUEST,
                ),
                allowed_extensions: parse_list(
                    lookup("ALLOWED_EXTENSIONS"),
                    DEFAULT_ALLOWED_EXTENSIONS,
                ),
                allowed_content_types: parse_list(
                    lookup("ALLOWED_CONTENT_TYPES"),
                    DEFAULT_ALLOWED_CONTENT_TYPES,
                ),
            },
            derivatives: DerivativeOptions {
                max_width: parse_or(lookup("IMAGE_MAX_WIDTH"), DEFAULT_MAX_WIDTH),
                max_height: parse_or(lookup("IMAGE_MAX_HEIGHT"), DEFAULT_MAX_HEIGHT),
                quality: parse_or(lookup("IMAGE_QUALITY"), DEFAULT_QUALITY),
                output_format,
                make_thumbnail: lookup("THUMBNAIL_ENABLED")
                    .map(|s| s.trim().to_lowercase())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
                thumbnail_size: parse_or(lookup("THUMBNAIL_SIZE"), DEFAULT_THUMBNAIL_SIZE),
                thumbnail_quality: parse_or(
                    lookup("THUMBNAIL_QUALITY"),
                    DEFAULT_THUMBNAIL_QUALITY,
                ),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.upload.max_files_per_request == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILES_PER_REQUEST must be greater than 0"
            ));
        }

        if self.upload.allowed_extensions.is_empty() || self.upload.allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        let d = &self.derivatives;
        if d.max_width == 0 || d.max_height == 0 {
            return Err(anyhow::anyhow!(
                "IMAGE_MAX_WIDTH and IMAGE_MAX_HEIGHT must be greater than 0"
            ));
        }

        if d.thumbnail_size == 0 {
            return Err(anyhow::anyhow!("THUMBNAIL_SIZE must be greater than 0"));
        }

        for (name, quality) in [
            ("IMAGE_QUALITY", d.quality),
            ("THUMBNAIL_QUALITY", d.thumbnail_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(anyhow::anyhow!("{} must be between 1 and 100", name));
            }
        }

        let base_url = self.storage.base_url.to_lowercase();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "BASE_URL must start with http:// or https://"
            ));
        }

        Ok(())
    }
}
