//! Public URL generation for stored assets.

use crate::constants::{DEFAULT_BASE_URL, UPLOADS_URL_SEGMENT};
use crate::models::AssetKind;

/// Maps a stored filename and asset kind to an externally addressable URL.
///
/// Pure: no filesystem access, and the file need not exist.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base_url: String,
}

impl UrlResolver {
    /// Falls back to `http://localhost:3000` when `base_url` is `None` or blank.
    pub fn new(base_url: Option<&str>) -> Self {
        let base = base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        Self {
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve(&self, filename: &str, kind: AssetKind) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            UPLOADS_URL_SEGMENT,
            kind.directory(),
            filename
        )
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new(None)
    }
}
