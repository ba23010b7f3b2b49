use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Whether an image of `width`×`height` falls outside the bounding box.
    pub fn exceeds(width: u32, height: u32, max_width: u32, max_height: u32) -> bool {
        width > max_width || height > max_height
    }

    /// Largest size that fits inside the box, aspect preserved, never upscaled.
    pub fn fit_inside_dimensions(
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    ) -> (u32, u32) {
        if !Self::exceeds(width, height, max_width, max_height) {
            return (width, height);
        }

        let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
        (new_width, new_height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    pub fn fit_inside(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) =
            Self::fit_inside_dimensions(orig_width, orig_height, max_width, max_height);
        if (width, height) == (orig_width, orig_height) {
            return img.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Centred square crop of the source, resized to `size`×`size`.
    ///
    /// Cropping first keeps the intermediate buffer no larger than the
    /// source's short edge squared, whatever the aspect ratio.
    pub fn fit_cover(img: &DynamicImage, size: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let side = orig_width.min(orig_height);
        let x = (orig_width - side) / 2;
        let y = (orig_height - side) / 2;

        let square = img.crop_imm(x, y, side, side);
        let filter = Self::select_filter(side, side, size, size);
        square.resize_exact(size, size, filter)
    }
}
