//! Default limits and names used across the pipeline.

/// Multipart field carrying a single image.
pub const SINGLE_UPLOAD_FIELD: &str = "image";

/// Multipart field carrying a batch of images.
pub const BATCH_UPLOAD_FIELD: &str = "images";

pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 5;
pub const DEFAULT_MAX_FILES_PER_REQUEST: usize = 10;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_MAX_HEIGHT: u32 = 1200;
pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 300;
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 80;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Directory (under the upload root) for originals and processed renditions.
pub const IMAGES_DIR: &str = "images";
/// Directory (under the upload root) for thumbnails.
pub const THUMBNAILS_DIR: &str = "thumbnails";

/// URL path segment all stored assets are served under.
pub const UPLOADS_URL_SEGMENT: &str = "uploads";

pub const PROCESSED_PREFIX: &str = "processed-";
pub const THUMBNAIL_PREFIX: &str = "thumb-";
