//! Generated image fixtures.

use std::io::Cursor;

use catalog_media_core::RawFile;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn pattern(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&pattern(width, height), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&pattern(width, height), ImageFormat::Png)
}

pub fn jpeg_file(name: &str, width: u32, height: u32) -> RawFile {
    RawFile::new(name, "image/jpeg", jpeg_bytes(width, height))
}

pub fn png_file(name: &str, width: u32, height: u32) -> RawFile {
    RawFile::new(name, "image/png", png_bytes(width, height))
}

pub fn pdf_file(name: &str) -> RawFile {
    RawFile::new(name, "application/pdf", b"%PDF-1.4 not an image".to_vec())
}
