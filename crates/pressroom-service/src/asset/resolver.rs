//! Asset record resolution.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use pressroom_core::result::AppResult;
use pressroom_entity::asset::Asset;
use pressroom_entity::store::AssetStore;

/// Resolves the [`Asset`] record an image descriptor refers to.
///
/// Lookup is by the image's *current* filename, restricted to assets
/// attached to content of the requesting tenant. Unattached records in
/// other tenants are invisible here, so two tenants can each own a
/// `header.jpg` without interfering.
#[derive(Clone)]
pub struct AssetResolver {
    assets: Arc<dyn AssetStore>,
}

impl AssetResolver {
    /// Create a new resolver over the given asset store.
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Self { assets }
    }

    /// Find the asset currently named `original` within the scope, or
    /// construct a fresh detached record when no attached asset matches.
    pub async fn resolve(&self, original: &str, scope_id: Uuid) -> AppResult<Asset> {
        let mut matches = self
            .assets
            .find_attached_by_filename(original, scope_id)
            .await?;

        match matches.drain(..).next() {
            Some(asset) => Ok(asset),
            None => {
                debug!(original, %scope_id, "No attached asset found, creating detached record");
                Ok(Asset::detached(original))
            }
        }
    }
}
