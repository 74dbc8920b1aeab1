//! Post-to-asset association entry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry in a post's asset association set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AssetLink {
    /// The associated asset.
    pub asset_id: Uuid,
    /// Whether this asset is the post's default/featured image.
    pub is_default: bool,
}

impl AssetLink {
    /// Create a new association entry.
    pub fn new(asset_id: Uuid, is_default: bool) -> Self {
        Self {
            asset_id,
            is_default,
        }
    }
}
