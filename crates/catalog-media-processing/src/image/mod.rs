//! Image processing module
//!
//! - Decoding and dimension probing (processor)
//! - Fit-inside and fit-cover resizing (resize)

pub mod processor;
pub mod resize;

pub use processor::ImageProcessor;
pub use resize::ImageResize;
