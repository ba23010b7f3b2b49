//! Image processor - decoding and dimension probing

use std::io::Cursor;

use image::{DynamicImage, ImageReader};

pub struct ImageProcessor;

impl ImageProcessor {
    /// Read width and height from the image header without decoding pixels.
    pub fn dimensions(data: &[u8]) -> Result<(u32, u32), anyhow::Error> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    /// Decode the full image. Format is guessed from content, not the declared type.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, anyhow::Error> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        Ok(reader.decode()?)
    }
}
