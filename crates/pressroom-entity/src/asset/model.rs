//! Asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One physical image file known to PressRoom, together with its scaled
/// variant geometry.
///
/// `filename` is unique within a tenant's asset directory at any instant;
/// the `id` is stable across renames. Assets are created lazily on first
/// encounter of an original filename and are never hard-deleted by the
/// reconciliation pipeline — occupants renamed away during collision
/// resolution persist as historical artifacts reachable from their
/// revision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    /// Unique asset identifier. Generated client-side so that unsaved
    /// records can be upserted without a separate insert path.
    pub id: Uuid,
    /// Current filename (including extension) inside the tenant directory.
    pub filename: String,
    /// Alt/label text used in image references.
    pub alt_text: String,
    /// Requested scaled width in pixels (0 = no explicit crop).
    pub scaled_width: i32,
    /// Requested scaled height in pixels (0 = no explicit crop).
    pub scaled_height: i32,
    /// Storage path of the scaled variant, if one has been generated.
    pub scaled_path: Option<String>,
    /// When the asset record was created.
    pub created_at: DateTime<Utc>,
    /// When the asset record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Construct a fresh, unsaved asset for a newly encountered filename.
    pub fn detached(filename: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            alt_text: String::new(),
            scaled_width: 0,
            scaled_height: 0,
            scaled_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Split the filename into stem and extension at the last dot.
    pub fn stem_and_extension(&self) -> (&str, Option<&str>) {
        match self.filename.rsplit_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (self.filename.as_str(), None),
        }
    }

    /// Build the collision-safe name used when this asset's file must be
    /// renamed out of the way of an incoming upload: `-rev` plus a
    /// seconds-resolution timestamp appended to the stem.
    pub fn collision_filename(&self, timestamp: i64) -> String {
        match self.stem_and_extension() {
            (stem, Some(ext)) => format!("{stem}-rev{timestamp}.{ext}"),
            (stem, None) => format!("{stem}-rev{timestamp}"),
        }
    }

    /// Whether this asset's scaled variant already lives under a revision
    /// archive, meaning an earlier collision resolution has dealt with it.
    pub fn is_revision_archived(&self) -> bool {
        self.scaled_path
            .as_deref()
            .is_some_and(|p| p.contains("revisions"))
    }
}
