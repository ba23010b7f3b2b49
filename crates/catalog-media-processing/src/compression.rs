use std::io::Cursor;

use anyhow::Result;
use bytes::Bytes;
use catalog_media_core::OutputFormat;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Encodes renditions in the configured output format
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format`. `quality` (1-100) is ignored for lossless PNG.
    pub fn compress(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Bytes> {
        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
        }
    }

    /// Progressive JPEG via mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(Bytes::from(jpeg_data))
    }

    fn compress_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)?;

        Ok(Bytes::from(buffer))
    }

    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageProcessor;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_compress_every_format_round_trips_dimensions() {
        let img = gradient(64, 48);
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            let data = ImageCompressor::compress(&img, format, 85).unwrap();
            assert!(!data.is_empty(), "{} produced no data", format);
            assert_eq!(ImageProcessor::dimensions(&data).unwrap(), (64, 48));
        }
    }

    #[test]
    fn test_jpeg_output_is_jpeg() {
        let data = ImageCompressor::compress(&gradient(16, 16), OutputFormat::Jpeg, 80).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&data).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = gradient(256, 256);
        let high = ImageCompressor::compress(&img, OutputFormat::Jpeg, 95).unwrap();
        let low = ImageCompressor::compress(&img, OutputFormat::Jpeg, 20).unwrap();
        assert!(low.len() < high.len());
    }
}
