//! Per-edit asset reconciliation.
//!
//! Runs the full reconciliation for every image descriptor of an edit, in
//! submission order: resolve the asset record, plan the move, clear any
//! destination collision, execute the move, regenerate the scaled variant,
//! persist the record, and rewrite body references. Descriptors are
//! processed strictly sequentially; an error aborts the edit and leaves
//! already-completed file moves in place.

use std::sync::Arc;

use tracing::{debug, warn};

use pressroom_core::config::storage::StorageConfig;
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;
use pressroom_entity::asset::{Asset, AssetLink, ImageDescriptor};
use pressroom_entity::post::Post;
use pressroom_entity::store::{AssetStore, PostStore};
use pressroom_storage::thumbnail::generator::ThumbnailGenerator;

use super::collision::CollisionResolver;
use super::mover::AssetMover;
use super::planner::PathPlanner;
use super::resolver::AssetResolver;
use super::rewriter::ContentRewriter;
use crate::context::EditContext;

/// What a pipeline run produced: the rewritten body and the association
/// links to store, one per descriptor in submission order.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Post body with all image references rewritten.
    pub body: String,
    /// Asset links ready for [`super::AssociationSyncer::sync`].
    pub links: Vec<AssetLink>,
}

/// The asset-reconciliation pipeline.
#[derive(Clone)]
pub struct AssetPipeline {
    provider: Arc<dyn StorageProvider>,
    assets: Arc<dyn AssetStore>,
    resolver: AssetResolver,
    planner: PathPlanner,
    collisions: CollisionResolver,
    mover: AssetMover,
    thumbnails: ThumbnailGenerator,
    rewriter: ContentRewriter,
    config: StorageConfig,
}

impl AssetPipeline {
    /// Wire up the pipeline stages over the given stores and provider.
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        assets: Arc<dyn AssetStore>,
        posts: Arc<dyn PostStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            resolver: AssetResolver::new(assets.clone()),
            planner: PathPlanner::new(provider.clone(), &config.staging_dir),
            collisions: CollisionResolver::new(
                provider.clone(),
                assets.clone(),
                posts,
                &config.scaled_dir_name,
            ),
            mover: AssetMover::new(provider.clone(), &config.scaled_dir_name),
            thumbnails: ThumbnailGenerator::new(provider.clone(), &config.scaled_dir_name),
            rewriter: ContentRewriter::new(),
            provider,
            assets,
            config,
        }
    }

    /// Reconcile every image of the edit against `body`, returning the
    /// rewritten body and the association links.
    ///
    /// Callers serialize concurrent edits of the same post; the pipeline
    /// itself provides no cross-request isolation.
    pub async fn process(
        &self,
        ctx: &EditContext,
        post: &Post,
        descriptors: &[ImageDescriptor],
        body: String,
    ) -> AppResult<PipelineOutcome> {
        let origin_dir = ctx.origin_scope().asset_dir();
        let dest_dir = ctx.scope.asset_dir();

        let mut body = body;
        let mut links = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let asset = self
                .process_descriptor(post, descriptor, &origin_dir, &dest_dir, &mut body)
                .await
                .inspect_err(|e| {
                    warn!(
                        post_id = %post.id,
                        original = %descriptor.original,
                        error = %e,
                        "Asset reconciliation aborted; completed moves are kept"
                    );
                })?;
            links.push(AssetLink::new(asset.id, descriptor.is_default));
        }

        Ok(PipelineOutcome { body, links })
    }

    async fn process_descriptor(
        &self,
        post: &Post,
        descriptor: &ImageDescriptor,
        origin_dir: &str,
        dest_dir: &str,
        body: &mut String,
    ) -> AppResult<Asset> {
        let mut asset = self
            .resolver
            .resolve(&descriptor.original, post.scope_id)
            .await?;

        let plan = self
            .planner
            .plan(origin_dir, dest_dir, &descriptor.original, &descriptor.filename)
            .await?;

        let moved = plan.requires_move();
        let mut collided = false;
        if moved {
            if self.provider.exists(&plan.dest).await? {
                let outcome = self
                    .collisions
                    .resolve(&plan, post.id, &descriptor.filename, asset)
                    .await?;
                asset = outcome.asset;
                collided = true;
            }

            self.mover
                .relocate(&plan, &descriptor.original, &descriptor.filename, collided)
                .await?;
            asset.filename = descriptor.filename.clone();
        }

        asset.alt_text = descriptor.label.clone();
        asset.scaled_width = descriptor.scaled_width as i32;
        asset.scaled_height = descriptor.scaled_height as i32;

        let scaled_path = if descriptor.wants_crop() {
            self.thumbnails
                .crop(
                    dest_dir,
                    &asset.filename,
                    descriptor.scaled_width,
                    descriptor.scaled_height,
                )
                .await?
        } else {
            self.thumbnails.copy_full(dest_dir, &asset.filename).await?
        };
        asset.scaled_path = Some(scaled_path);

        let asset = self.assets.save(&asset).await?;

        // The staged upload's preview thumb is no longer needed.
        let thumb = format!("{}/{}", self.config.upload_thumb_dir(), descriptor.original);
        if let Err(e) = self.provider.delete(&thumb).await {
            debug!(thumb, error = %e, "Upload preview cleanup failed");
        }

        *body = self.rewriter.rewrite(
            body,
            &descriptor.original,
            &descriptor.filename,
            &descriptor.label,
        )?;
        if moved {
            // The file left staging, so references must not keep the
            // staging path prefix.
            *body = self.rewriter.strip_staging_prefix(body, &descriptor.filename);
        }

        Ok(asset)
    }
}
