//! Per-request image descriptor.

use serde::{Deserialize, Serialize};

/// Transient description of one image in an edit submission.
///
/// Not persisted; consumed once per edit. `original` is the filename the
/// image currently has (in staging or in the originating tenant directory),
/// `filename` is the target filename inside the destination tenant
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Filename the upload currently carries.
    pub original: String,
    /// Target filename inside the tenant's canonical directory.
    pub filename: String,
    /// Label/alt text for the image.
    #[serde(default)]
    pub label: String,
    /// Requested crop width in pixels (0 = no crop, copy full image).
    #[serde(default)]
    pub scaled_width: u32,
    /// Requested crop height in pixels (0 = no crop, copy full image).
    #[serde(default)]
    pub scaled_height: u32,
    /// Whether this image is the post's default/featured image. Computed
    /// once by the caller; at most one descriptor per request should carry
    /// it.
    #[serde(default)]
    pub is_default: bool,
}

impl ImageDescriptor {
    /// Whether an explicit crop was requested for the scaled variant.
    pub fn wants_crop(&self) -> bool {
        self.scaled_width > 0 && self.scaled_height > 0
    }
}
