//! Error types module
//!
//! Every failure a file can hit on its way through the upload pipeline is an
//! [`UploadError`]. The first four variants are client errors raised before
//! any disk I/O; `Io` covers storage and derivation failures, which always
//! trigger cleanup of the file's artifacts.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code a caller should map this error to
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (never includes internal details)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported file type: {filename} ({content_type})")]
    UnsupportedType {
        filename: String,
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Batch limit exceeded: at most {max} files per request")]
    BatchLimitExceeded { max: usize },

    #[error("No image file provided")]
    NoFileProvided,

    #[error("IO error: {0}")]
    Io(String),
}

impl UploadError {
    /// Client errors are rejected before anything is written to disk.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Io(_))
    }
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        UploadError::Io(format!("{:#}", err))
    }
}

impl ErrorMetadata for UploadError {
    fn http_status_code(&self) -> u16 {
        match self {
            UploadError::UnsupportedType { .. } => 400,
            UploadError::TooLarge { .. } => 413,
            UploadError::BatchLimitExceeded { .. } => 400,
            UploadError::NoFileProvided => 400,
            UploadError::Io(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UploadError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            UploadError::TooLarge { .. } => "TOO_LARGE",
            UploadError::BatchLimitExceeded { .. } => "BATCH_LIMIT_EXCEEDED",
            UploadError::NoFileProvided => "NO_FILE_PROVIDED",
            UploadError::Io(_) => "IO_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::UnsupportedType { allowed, .. } => format!(
                "Only image files are allowed ({})",
                allowed.join(", ")
            ),
            UploadError::TooLarge { max, .. } => format!(
                "File too large. Maximum size is {} MB",
                max / 1024 / 1024
            ),
            UploadError::BatchLimitExceeded { max } => {
                format!("Too many files. Maximum is {} files per request", max)
            }
            UploadError::NoFileProvided => "No image file provided".to_string(),
            UploadError::Io(_) => "Error processing uploaded image".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Io(_) => LogLevel::Error,
            UploadError::BatchLimitExceeded { .. } => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}
