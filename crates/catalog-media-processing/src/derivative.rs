//! Derivative generator
//!
//! Produces at most two renditions per stored original:
//!
//! - **processed**: fit-inside downscale to the bounding box, only when the
//!   original exceeds it. Small originals are never re-encoded.
//! - **thumbnail**: fit-cover, centre-cropped square of `thumbnail_size`,
//!   whenever thumbnails are enabled.
//!
//! Decode, resize and encode are CPU-bound and run on the blocking pool.
//! Either rendition failing fails the whole file.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use catalog_media_core::{
    AssetKind, DerivativeOptions, DerivedAsset, Rendition, StoredOriginal, UploadError,
};
use catalog_media_storage::naming::derived_filename;
use catalog_media_storage::{ArtifactGuard, Storage};
use image::GenericImageView;

use crate::compression::ImageCompressor;
use crate::image::{ImageProcessor, ImageResize};

/// Intrinsic size of the original plus whatever was derived from it.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub width: u32,
    pub height: u32,
    pub asset: DerivedAsset,
}

struct Encoded {
    data: Bytes,
    width: u32,
    height: u32,
}

struct Rendered {
    width: u32,
    height: u32,
    processed: Option<Encoded>,
    thumbnail: Option<Encoded>,
}

fn render(data: &[u8], options: &DerivativeOptions) -> anyhow::Result<Rendered> {
    let (width, height) =
        ImageProcessor::dimensions(data).context("Failed to read image dimensions")?;

    let needs_resize = ImageResize::exceeds(width, height, options.max_width, options.max_height);
    if !needs_resize && !options.make_thumbnail {
        return Ok(Rendered {
            width,
            height,
            processed: None,
            thumbnail: None,
        });
    }

    let img = ImageProcessor::decode(data).context("Failed to decode image")?;

    let processed = if needs_resize {
        let resized = ImageResize::fit_inside(&img, options.max_width, options.max_height);
        let (w, h) = resized.dimensions();
        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = w,
            to_height = h,
            "Downscaling original"
        );
        Some(Encoded {
            data: ImageCompressor::compress(&resized, options.output_format, options.quality)
                .context("Failed to encode processed image")?,
            width: w,
            height: h,
        })
    } else {
        None
    };

    let thumbnail = if options.make_thumbnail {
        let thumb = ImageResize::fit_cover(&img, options.thumbnail_size);
        let (w, h) = thumb.dimensions();
        Some(Encoded {
            data: ImageCompressor::compress(
                &thumb,
                options.output_format,
                options.thumbnail_quality,
            )
            .context("Failed to encode thumbnail")?,
            width: w,
            height: h,
        })
    } else {
        None
    };

    Ok(Rendered {
        width,
        height,
        processed,
        thumbnail,
    })
}

pub struct DerivativeGenerator {
    storage: Arc<dyn Storage>,
    options: DerivativeOptions,
}

impl DerivativeGenerator {
    pub fn new(storage: Arc<dyn Storage>, options: DerivativeOptions) -> Self {
        Self { storage, options }
    }

    /// Derive renditions for `original`, registering each output path with
    /// `guard` before it is written.
    pub async fn derive(
        &self,
        original: &StoredOriginal,
        guard: &mut ArtifactGuard,
    ) -> Result<Derivation, UploadError> {
        let data = self
            .storage
            .get(AssetKind::Original, &original.filename)
            .await?;

        let options = self.options.clone();
        let rendered = tokio::task::spawn_blocking(move || render(&data, &options))
            .await
            .map_err(|e| UploadError::Io(format!("Derivative task failed: {}", e)))??;

        let mut asset = DerivedAsset::default();
        if let Some(encoded) = rendered.processed {
            asset.processed = Some(
                self.write(&original.filename, AssetKind::Processed, encoded, guard)
                    .await?,
            );
        }
        if let Some(encoded) = rendered.thumbnail {
            asset.thumbnail = Some(
                self.write(&original.filename, AssetKind::Thumbnail, encoded, guard)
                    .await?,
            );
        }

        tracing::info!(
            filename = %original.filename,
            width = rendered.width,
            height = rendered.height,
            processed = asset.processed.is_some(),
            thumbnail = asset.thumbnail.is_some(),
            "Derivatives generated"
        );

        Ok(Derivation {
            width: rendered.width,
            height: rendered.height,
            asset,
        })
    }

    async fn write(
        &self,
        original: &str,
        kind: AssetKind,
        encoded: Encoded,
        guard: &mut ArtifactGuard,
    ) -> Result<Rendition, UploadError> {
        let filename = derived_filename(original, kind, self.options.output_format);
        guard.track(self.storage.path_for(kind, &filename)?);

        let size_bytes = encoded.data.len() as u64;
        let path = self.storage.put(kind, &filename, encoded.data).await?;

        Ok(Rendition {
            filename,
            path,
            width: encoded.width,
            height: encoded.height,
            size_bytes,
        })
    }
}
