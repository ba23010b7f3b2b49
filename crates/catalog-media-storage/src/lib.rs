//! Catalog Media Storage Library
//!
//! Filesystem persistence for uploaded catalog images: the [`Storage`] trait
//! and its local implementation, unique filename generation, the allocator
//! that persists originals, and the cleanup sweeper used on failure.
//!
//! # Layout
//!
//! - originals and processed renditions: `{root}/images/{filename}`
//! - thumbnails: `{root}/thumbnails/{filename}`
//!
//! Filenames must be a single path component; anything containing a
//! separator or `..` is rejected before touching the filesystem.

pub mod allocator;
pub mod cleanup;
pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use allocator::StorageAllocator;
pub use cleanup::{ArtifactGuard, CleanupSweeper};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
