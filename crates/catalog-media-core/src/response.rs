//! Serializable response shapes handed back to the HTTP layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorMetadata, UploadError};
use crate::models::{AssetKind, BatchResult, ProcessedImage};
use crate::url::UrlResolver;

/// Per-image success payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_url: String,
    /// Processed rendition when one was produced, otherwise the original.
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub size: u64,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl UploadResponse {
    pub fn from_processed(image: &ProcessedImage, resolver: &UrlResolver) -> Self {
        let original_url = resolver.resolve(&image.original.filename, AssetKind::Original);
        let url = match &image.derived.processed {
            Some(processed) => resolver.resolve(&processed.filename, AssetKind::Processed),
            None => original_url.clone(),
        };
        let thumbnail_url = image
            .derived
            .thumbnail
            .as_ref()
            .map(|thumb| resolver.resolve(&thumb.filename, AssetKind::Thumbnail));

        Self {
            id: image.id,
            filename: image.original.filename.clone(),
            original_url,
            url,
            thumbnail_url,
            size: image.metadata.size_bytes,
            mime_type: image.metadata.mime_type.clone(),
            width: image.metadata.width,
            height: image.metadata.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub message: String,
    pub images: Vec<UploadResponse>,
    pub failed: Vec<String>,
}

impl BatchUploadResponse {
    pub fn from_result(result: &BatchResult, resolver: &UrlResolver) -> Self {
        let images: Vec<UploadResponse> = result
            .succeeded()
            .map(|image| UploadResponse::from_processed(image, resolver))
            .collect();
        let failed = result.failed_filenames();

        let message = if result.is_failure() {
            "Failed to process any images".to_string()
        } else if failed.is_empty() {
            format!("Successfully uploaded {} images", images.len())
        } else {
            format!(
                "Uploaded {} images. Failed: {}",
                images.len(),
                failed.join(", ")
            )
        };

        Self {
            success: !result.is_failure(),
            message,
            images,
            failed,
        }
    }
}

/// Error body: reason-coded message, never internal details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&UploadError> for ErrorResponse {
    fn from(err: &UploadError) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code().to_string(),
        }
    }
}
