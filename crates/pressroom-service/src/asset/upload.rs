//! Upload staging.
//!
//! Fresh uploads land in the shared staging directory, untied to any
//! tenant, and get a square preview thumbnail for the editor UI. The
//! reconciliation pipeline later claims them from there on the first edit
//! that references them.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use pressroom_core::config::storage::StorageConfig;
use pressroom_core::error::AppError;
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;
use pressroom_storage::thumbnail::generator::{ThumbnailGenerator, probe_dimensions};

/// Editor-facing description of a freshly staged upload.
#[derive(Debug, Clone, Serialize)]
pub struct StagedUpload {
    /// Opaque per-upload identifier (microsecond timestamp).
    pub ident: String,
    /// Filename the upload was stored under in staging.
    pub name: String,
    /// Suggested alt text, derived from the post title and filename.
    pub alt: String,
    /// Upload size in bytes.
    pub size: u64,
    /// Public URL of the staged file.
    pub url: String,
    /// Public URL of the preview thumbnail.
    pub thumbnail_url: String,
    /// Intrinsic image width in pixels.
    pub width: u32,
    /// Intrinsic image height in pixels.
    pub height: u32,
}

/// Stages editor uploads and generates their preview thumbnails.
#[derive(Clone)]
pub struct UploadService {
    provider: Arc<dyn StorageProvider>,
    thumbnails: ThumbnailGenerator,
    config: StorageConfig,
}

impl UploadService {
    /// Create a new upload service.
    pub fn new(provider: Arc<dyn StorageProvider>, config: StorageConfig) -> Self {
        Self {
            thumbnails: ThumbnailGenerator::new(provider.clone(), &config.scaled_dir_name),
            provider,
            config,
        }
    }

    /// Validate and store one upload in the staging directory, replacing
    /// any staged file of the same name, and generate its square preview
    /// thumbnail. `post_title` seeds the suggested alt text.
    pub async fn stage(
        &self,
        original_name: &str,
        data: Bytes,
        post_title: &str,
    ) -> AppResult<StagedUpload> {
        if original_name.trim().is_empty() {
            return Err(AppError::validation("Upload is missing a filename"));
        }
        if data.is_empty() {
            return Err(AppError::validation("Upload is empty"));
        }
        // Rejects non-image payloads before anything touches disk.
        let (width, height) = probe_dimensions(&data)?;

        let size = data.len() as u64;
        let path = format!("{}/{original_name}", self.config.staging_dir);
        self.provider.write(&path, data).await?;

        // A same-named earlier upload may have left a preview behind.
        let stale_thumb = format!("{}/{original_name}", self.config.upload_thumb_dir());
        if let Err(e) = self.provider.delete(&stale_thumb).await {
            debug!(path = stale_thumb, error = %e, "Stale preview cleanup failed");
        }

        let thumb = self
            .thumbnails
            .preview(
                &path,
                &self.config.upload_thumb_dir(),
                self.config.upload_thumb_size,
            )
            .await?;

        info!(name = original_name, size, width, height, "Staged upload");
        Ok(StagedUpload {
            ident: Utc::now().timestamp_micros().to_string(),
            name: original_name.to_string(),
            alt: format!("{post_title} ({original_name})"),
            size,
            url: format!("/{path}"),
            thumbnail_url: format!("/{thumb}"),
            width,
            height,
        })
    }
}
