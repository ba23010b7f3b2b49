//! Catalog Media Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, URL
//! resolution and response shapes shared by every catalog-media component.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod models;
pub mod response;
pub mod url;

// Re-export commonly used types
pub use config::{DerivativeOptions, MediaConfig, StorageConfig, UploadLimits};
pub use error::{ErrorMetadata, LogLevel, UploadError};
pub use format::OutputFormat;
pub use models::{
    AssetKind, BatchResult, DerivedAsset, ImageMetadata, ProcessedImage, ProcessingOutcome,
    RawFile, Rendition, StoredOriginal, UploadRequest,
};
pub use response::{BatchUploadResponse, ErrorResponse, UploadResponse};
pub use url::UrlResolver;
