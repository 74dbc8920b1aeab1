//! Scaled-variant generator for image assets.
//!
//! Every asset gets a file at the conventional `scaled/` path inside its
//! tenant directory: either an exact-dimension crop when the edit requested
//! one, or a byte-identical copy of the full image when it did not.

use std::sync::Arc;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;

/// Generates scaled variants of image assets.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    /// Storage provider for reading source files and writing variants.
    provider: Arc<dyn StorageProvider>,
    /// Name of the scaled subdirectory inside each tenant directory.
    scaled_dir_name: String,
}

impl ThumbnailGenerator {
    /// Create a new generator writing variants into `<dir>/<scaled_dir_name>/`.
    pub fn new(provider: Arc<dyn StorageProvider>, scaled_dir_name: &str) -> Self {
        Self {
            provider,
            scaled_dir_name: scaled_dir_name.to_string(),
        }
    }

    /// Conventional scaled-variant path for a file in a tenant directory.
    pub fn scaled_path(&self, dir: &str, filename: &str) -> String {
        format!("{dir}/{}/{filename}", self.scaled_dir_name)
    }

    /// Crop `<dir>/<filename>` to exactly `width` x `height` pixels and
    /// write the result to the scaled subdirectory, returning its relative
    /// path. This is the only path that overwrites stale geometry.
    pub async fn crop(
        &self,
        dir: &str,
        filename: &str,
        width: u32,
        height: u32,
    ) -> AppResult<String> {
        let source = format!("{dir}/{filename}");
        let data = self.provider.read_bytes(&source).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Thumbnail,
                format!("Cannot read image for scaling: {source}"),
                e,
            )
        })?;

        let scaled = tokio::task::spawn_blocking(move || crop_image(&data, width, height))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Scaling task panicked", e)
            })??;

        let out = self.scaled_path(dir, filename);
        self.provider.write(&out, scaled).await?;

        debug!(source, width, height, output = %out, "Generated scaled variant");
        Ok(out)
    }

    /// Fall back to a byte-identical copy of the full image into the
    /// scaled subdirectory when no crop was requested. Callers still expect
    /// a scaled-variant file to exist at the conventional path.
    pub async fn copy_full(&self, dir: &str, filename: &str) -> AppResult<String> {
        let source = format!("{dir}/{filename}");
        let out = self.scaled_path(dir, filename);
        self.provider.copy(&source, &out).await?;

        debug!(source, output = %out, "Copied full image as scaled variant");
        Ok(out)
    }

    /// Generate the square preview thumbnail for a freshly staged upload,
    /// written under `thumb_dir` with the same filename.
    pub async fn preview(
        &self,
        source_path: &str,
        thumb_dir: &str,
        size: u32,
    ) -> AppResult<String> {
        let data = self.provider.read_bytes(source_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Thumbnail,
                format!("Cannot read staged upload: {source_path}"),
                e,
            )
        })?;

        let thumb = tokio::task::spawn_blocking(move || crop_image(&data, size, size))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Scaling task panicked", e)
            })??;

        let filename = source_path.rsplit('/').next().unwrap_or(source_path);
        let out = format!("{thumb_dir}/{filename}");
        self.provider.write(&out, thumb).await?;
        Ok(out)
    }
}

/// Decode, crop to exact dimensions, and re-encode in the source format.
fn crop_image(data: &[u8], width: u32, height: u32) -> AppResult<Bytes> {
    let format = encode_format(data);
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::with_source(ErrorKind::Thumbnail, "Unsupported image format", e))?;

    let cropped = img.resize_to_fill(width, height, FilterType::Lanczos3);
    // The JPEG encoder rejects alpha channels.
    let cropped = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(cropped.to_rgb8())
    } else {
        cropped
    };

    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    cropped
        .write_to(&mut cursor, format)
        .map_err(|e| AppError::with_source(ErrorKind::Thumbnail, "Failed to encode variant", e))?;

    Ok(Bytes::from(buf))
}

/// Pick the output encoding for a source image, keeping the source format
/// where the `image` crate can encode it and falling back to PNG otherwise.
fn encode_format(data: &[u8]) -> ImageFormat {
    match image::guess_format(data) {
        Ok(
            f @ (ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Gif
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP),
        ) => f,
        _ => ImageFormat::Png,
    }
}

/// Intrinsic pixel dimensions of an encoded image.
pub fn probe_dimensions(data: &[u8]) -> AppResult<(u32, u32)> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::with_source(ErrorKind::Thumbnail, "Unsupported image format", e))?;
    Ok((img.width(), img.height()))
}
