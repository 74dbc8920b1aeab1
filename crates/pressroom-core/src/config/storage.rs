//! Asset storage configuration.

use serde::{Deserialize, Serialize};

/// Asset directory layout and upload staging configuration.
///
/// All paths are relative to `asset_root`, which is the single directory
/// the storage provider is rooted at. Per-tenant directories live under
/// `assets/<tenant>/blog/` inside that root; the staging directory is
/// shared across tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all publicly served assets.
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
    /// Shared staging directory where fresh uploads land before an edit
    /// assigns them to a tenant.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,
    /// Name of the scaled-variant subdirectory inside each tenant directory.
    #[serde(default = "default_scaled_dir_name")]
    pub scaled_dir_name: String,
    /// Name of the upload preview thumbnail subdirectory inside the
    /// staging directory.
    #[serde(default = "default_upload_thumb_dir_name")]
    pub upload_thumb_dir_name: String,
    /// Edge length in pixels of the square upload preview thumbnail.
    #[serde(default = "default_upload_thumb_size")]
    pub upload_thumb_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            staging_dir: default_staging_dir(),
            scaled_dir_name: default_scaled_dir_name(),
            upload_thumb_dir_name: default_upload_thumb_dir_name(),
            upload_thumb_size: default_upload_thumb_size(),
        }
    }
}

impl StorageConfig {
    /// Path of the upload preview thumbnail directory, relative to the root.
    pub fn upload_thumb_dir(&self) -> String {
        format!("{}/{}", self.staging_dir, self.upload_thumb_dir_name)
    }
}

fn default_asset_root() -> String {
    "./public".to_string()
}

fn default_staging_dir() -> String {
    "assets/shared/blog/upload".to_string()
}

fn default_scaled_dir_name() -> String {
    "scaled".to_string()
}

fn default_upload_thumb_dir_name() -> String {
    "uploadThumbs".to_string()
}

fn default_upload_thumb_size() -> u32 {
    190
}
