//! Upload pipeline: validate → allocate → derive.
//!
//! Each file runs as an isolated unit. Any failure after the original has
//! been written sweeps every artifact written for that file before the error
//! is reported; a batch records the failure and carries on with the rest.

use std::sync::Arc;

use catalog_media_core::{
    BatchResult, ErrorMetadata, ImageMetadata, LogLevel, MediaConfig, ProcessedImage,
    ProcessingOutcome, RawFile, UploadError, UploadRequest,
};
use catalog_media_storage::{ArtifactGuard, CleanupSweeper, Storage, StorageAllocator};
use futures::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

use crate::derivative::DerivativeGenerator;
use crate::validator::IngressValidator;

fn log_failure(filename: &str, error: &UploadError) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(filename = %filename, error = %error, error_code, "Upload rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(filename = %filename, error = %error, error_code, "Upload rejected");
        }
        LogLevel::Error => {
            tracing::error!(filename = %filename, error = %error, error_code, "Upload failed");
        }
    }
}

/// Runs uploads through the full pipeline.
///
/// Shares no mutable state between files, so one instance serves any number
/// of concurrent requests.
pub struct UploadPipeline {
    validator: IngressValidator,
    allocator: StorageAllocator,
    generator: DerivativeGenerator,
    sweeper: CleanupSweeper,
}

impl UploadPipeline {
    /// Storage must already be initialized (see [`Storage::init`]).
    pub fn new(config: &MediaConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            validator: IngressValidator::new(config.upload.clone()),
            allocator: StorageAllocator::new(storage.clone()),
            generator: DerivativeGenerator::new(storage, config.derivatives.clone()),
            sweeper: CleanupSweeper::new(),
        }
    }

    /// Single-file upload. `None` means the request carried no file.
    pub async fn process_single(
        &self,
        file: Option<RawFile>,
    ) -> Result<ProcessedImage, UploadError> {
        let Some(file) = file else {
            let error = UploadError::NoFileProvided;
            log_failure("", &error);
            return Err(error);
        };

        let span = tracing::info_span!("upload", filename = %file.filename);
        async {
            let result = self.validator.validate(&file);
            self.run(&file, result).await
        }
        .instrument(span)
        .await
    }

    /// Batch upload. Files run concurrently; outcomes keep input order.
    ///
    /// An empty request is rejected as [`UploadError::NoFileProvided`].
    #[tracing::instrument(skip(self, files), fields(files = files.len()))]
    pub async fn process_batch(&self, files: UploadRequest) -> Result<BatchResult, UploadError> {
        if files.is_empty() {
            let error = UploadError::NoFileProvided;
            log_failure("", &error);
            return Err(error);
        }

        let start = std::time::Instant::now();
        let total = files.len();

        let tasks = files.iter().enumerate().map(|(index, file)| {
            let span = tracing::info_span!("upload", index, filename = %file.filename);
            async move {
                let result = self.validator.validate_in_batch(file, index);
                match self.run(file, result).await {
                    Ok(image) => ProcessingOutcome::Success(Box::new(image)),
                    Err(reason) => ProcessingOutcome::Failure {
                        filename: file.filename.clone(),
                        reason,
                    },
                }
            }
            .instrument(span)
        });

        let result = BatchResult::from_outcomes(join_all(tasks).await);

        tracing::info!(
            total,
            succeeded = result.succeeded_count,
            failed = result.failed_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Batch upload finished"
        );

        Ok(result)
    }

    async fn run(
        &self,
        file: &RawFile,
        validation: Result<(), UploadError>,
    ) -> Result<ProcessedImage, UploadError> {
        if let Err(error) = validation {
            log_failure(&file.filename, &error);
            return Err(error);
        }

        let mut guard = ArtifactGuard::new(self.sweeper);
        match self.ingest(file, &mut guard).await {
            Ok(image) => {
                guard.disarm();
                Ok(image)
            }
            Err(error) => {
                log_failure(&file.filename, &error);
                guard.sweep().await;
                Err(error)
            }
        }
    }

    async fn ingest(
        &self,
        file: &RawFile,
        guard: &mut ArtifactGuard,
    ) -> Result<ProcessedImage, UploadError> {
        let start = std::time::Instant::now();

        let original = self.allocator.allocate(file, guard).await?;
        let derivation = self.generator.derive(&original, guard).await?;

        tracing::info!(
            stored_filename = %original.filename,
            size_bytes = original.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image upload processed"
        );

        let metadata = ImageMetadata {
            width: derivation.width,
            height: derivation.height,
            size_bytes: original.size_bytes,
            mime_type: original.content_type.clone(),
        };

        Ok(ProcessedImage {
            id: Uuid::new_v4(),
            original,
            derived: derivation.asset,
            metadata,
        })
    }
}
