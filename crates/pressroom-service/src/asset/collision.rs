//! Destination collision resolution.
//!
//! When a planned move targets a path that is already occupied, the
//! occupant is renamed out of the way rather than overwritten. Renamed
//! occupants keep their database record (under the new name), so images
//! referenced by revision snapshots of the same post stay reachable.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;
use pressroom_entity::asset::Asset;
use pressroom_entity::store::{AssetStore, PostStore};

use super::planner::PlannedMove;

/// Result of clearing one destination collision.
#[derive(Debug)]
pub struct CollisionOutcome {
    /// The asset record the incoming image should continue with. Differs
    /// from the input when the occupant turned out to be the incoming
    /// asset itself.
    pub asset: Asset,
}

/// Clears occupied destination paths ahead of an asset move.
#[derive(Clone)]
pub struct CollisionResolver {
    provider: Arc<dyn StorageProvider>,
    assets: Arc<dyn AssetStore>,
    posts: Arc<dyn PostStore>,
    scaled_dir_name: String,
}

impl CollisionResolver {
    /// Create a new resolver.
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        assets: Arc<dyn AssetStore>,
        posts: Arc<dyn PostStore>,
        scaled_dir_name: &str,
    ) -> Self {
        Self {
            provider,
            assets,
            posts,
            scaled_dir_name: scaled_dir_name.to_string(),
        }
    }

    /// Rename whatever occupies `plan.dest` out of the way.
    ///
    /// The occupant's record is looked up among assets attached to the
    /// edited post or any of its revision snapshots; occupants whose scaled
    /// variant already sits in a revision archive were handled by an
    /// earlier edit and are skipped. Callers invoke this only when the plan
    /// requires a move and the destination exists.
    pub async fn resolve(
        &self,
        plan: &PlannedMove,
        post_id: Uuid,
        target: &str,
        incoming: Asset,
    ) -> AppResult<CollisionOutcome> {
        let revision_ids = self.posts.revision_ids(post_id).await?;
        let occupant = self
            .assets
            .find_post_occupants(target, post_id, &revision_ids)
            .await?
            .into_iter()
            .find(|a| !a.is_revision_archived());

        let Some(mut occupant) = occupant else {
            // A file sits at the destination but no reachable record owns
            // it. Rename the file anyway so the move can proceed; the
            // orphan keeps existing under its collision name.
            let orphan = Asset::detached(target);
            let renamed = self.available_collision_name(&plan.dest_dir, &orphan).await?;
            self.rename_occupant_files(plan, target, &renamed).await?;
            warn!(
                dest = %plan.dest,
                renamed,
                "Destination file had no owning asset record, renamed as orphan"
            );
            return Ok(CollisionOutcome { asset: incoming });
        };

        // The occupant may be the very asset being moved (same record,
        // relocating between directories). Its record must stay with the
        // renamed historical file, so the incoming image continues under a
        // fresh record.
        let asset = if occupant.id == incoming.id {
            Asset::detached(incoming.filename.clone())
        } else {
            incoming
        };

        let renamed = self.available_collision_name(&plan.dest_dir, &occupant).await?;
        self.rename_occupant_files(plan, target, &renamed).await?;

        occupant.filename = renamed.clone();
        self.assets.save(&occupant).await?;

        info!(
            occupant_id = %occupant.id,
            dest = %plan.dest,
            renamed,
            "Renamed destination occupant ahead of incoming image"
        );
        Ok(CollisionOutcome { asset })
    }

    /// First collision name whose path is still free in the destination
    /// directory. Two collisions on the same stem within one second would
    /// otherwise produce the same name, and the second rename would
    /// overwrite the earlier historical file.
    async fn available_collision_name(&self, dest_dir: &str, asset: &Asset) -> AppResult<String> {
        let mut timestamp = Utc::now().timestamp();
        loop {
            let candidate = asset.collision_filename(timestamp);
            if !self
                .provider
                .exists(&format!("{dest_dir}/{candidate}"))
                .await?
            {
                return Ok(candidate);
            }
            timestamp += 1;
        }
    }

    /// Rename the occupant's primary file, and its scaled variant when one
    /// exists at the conventional path.
    async fn rename_occupant_files(
        &self,
        plan: &PlannedMove,
        target: &str,
        renamed: &str,
    ) -> AppResult<()> {
        self.provider
            .rename(&plan.dest, &format!("{}/{renamed}", plan.dest_dir))
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::MoveFailed,
                    format!("Failed to rename occupant {target} at {}", plan.dest),
                    e,
                )
            })?;

        let scaled = format!("{}/{}/{target}", plan.dest_dir, self.scaled_dir_name);
        if self.provider.exists(&scaled).await? {
            let scaled_renamed = format!("{}/{}/{renamed}", plan.dest_dir, self.scaled_dir_name);
            self.provider
                .rename(&scaled, &scaled_renamed)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::MoveFailed,
                        format!("Failed to rename occupant scaled variant {scaled}"),
                        e,
                    )
                })?;
        }

        Ok(())
    }
}
