use catalog_media_core::{RawFile, UploadError, UploadLimits};

/// Strip MIME parameters: `image/jpeg; charset=binary` → `image/jpeg`.
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Ingress validator
///
/// Checks client-declared metadata only; file contents are never sniffed.
/// Every check is pure, so a rejected file never reaches the filesystem.
#[derive(Debug, Clone)]
pub struct IngressValidator {
    limits: UploadLimits,
}

impl IngressValidator {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    fn unsupported(&self, file: &RawFile) -> UploadError {
        UploadError::UnsupportedType {
            filename: file.filename.clone(),
            content_type: file.content_type.clone(),
            allowed: self.limits.allowed_extensions.clone(),
        }
    }

    /// Validate file extension (case-insensitive). A missing extension is unsupported.
    pub fn validate_extension(&self, file: &RawFile) -> Result<(), UploadError> {
        let extension = file.extension().ok_or_else(|| self.unsupported(file))?;

        if !self
            .limits
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(self.unsupported(file));
        }

        Ok(())
    }

    pub fn validate_content_type(&self, file: &RawFile) -> Result<(), UploadError> {
        let normalized = normalize_mime_type(&file.content_type);

        if !self
            .limits
            .allowed_content_types
            .iter()
            .any(|ct| ct.eq_ignore_ascii_case(&normalized))
        {
            return Err(self.unsupported(file));
        }

        Ok(())
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), UploadError> {
        if size > self.limits.max_file_size_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.limits.max_file_size_bytes,
            });
        }

        Ok(())
    }

    /// Reject positions past the per-request limit (zero-based `index`).
    pub fn validate_batch_position(&self, index: usize) -> Result<(), UploadError> {
        if index >= self.limits.max_files_per_request {
            return Err(UploadError::BatchLimitExceeded {
                max: self.limits.max_files_per_request,
            });
        }

        Ok(())
    }

    /// Extension, then MIME type, then size.
    pub fn validate(&self, file: &RawFile) -> Result<(), UploadError> {
        self.validate_extension(file)?;
        self.validate_content_type(file)?;
        self.validate_file_size(file.size())?;
        Ok(())
    }

    /// [`validate`](Self::validate) plus the batch cardinality check.
    pub fn validate_in_batch(&self, file: &RawFile, index: usize) -> Result<(), UploadError> {
        self.validate(file)?;
        self.validate_batch_position(index)
    }
}
