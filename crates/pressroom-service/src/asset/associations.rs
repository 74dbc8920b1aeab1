//! Post/asset association synchronization.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use pressroom_core::result::AppResult;
use pressroom_entity::asset::AssetLink;
use pressroom_entity::store::AssetStore;

/// Replaces a post's asset association set after a successful pipeline run.
///
/// The sync is a full replace: exactly the assets of the current
/// submission remain associated, and any association not re-submitted is
/// removed. Removed associations do not delete the asset record or its
/// files.
#[derive(Clone)]
pub struct AssociationSyncer {
    assets: Arc<dyn AssetStore>,
}

impl AssociationSyncer {
    /// Create a new syncer over the given asset store.
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Self { assets }
    }

    /// Replace the post's associations with `links`, in submission order.
    pub async fn sync(&self, post_id: Uuid, links: &[AssetLink]) -> AppResult<()> {
        let defaults = links.iter().filter(|l| l.is_default).count();
        if defaults > 1 {
            // Callers are expected to flag at most one default; stored
            // as submitted either way.
            warn!(%post_id, defaults, "Multiple images flagged as default in one submission");
        }

        self.assets.replace_post_assets(post_id, links).await?;
        debug!(%post_id, count = links.len(), "Replaced post asset associations");
        Ok(())
    }
}
