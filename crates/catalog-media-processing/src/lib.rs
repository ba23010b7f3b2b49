//! Catalog Media Processing Library
//!
//! Ingress validation, image derivation (downscaled rendition and square
//! thumbnail) and the upload pipeline that runs one file, or a batch of
//! files, through validate → allocate → derive with cleanup on failure.

pub mod compression;
pub mod derivative;
pub mod image;
pub mod pipeline;
pub mod validator;

// Re-export commonly used types
pub use compression::ImageCompressor;
pub use derivative::{Derivation, DerivativeGenerator};
pub use image::{ImageProcessor, ImageResize};
pub use pipeline::UploadPipeline;
pub use validator::IngressValidator;
