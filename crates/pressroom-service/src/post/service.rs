//! Post create/update orchestration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pressroom_core::config::storage::StorageConfig;
use pressroom_core::result::AppResult;
use pressroom_core::traits::host::{BodyRenderer, PermissionGate, RedirectRecorder};
use pressroom_core::traits::storage::StorageProvider;
use pressroom_entity::asset::ImageDescriptor;
use pressroom_entity::post::{Post, PostStatus};
use pressroom_entity::store::{AssetStore, PostStore, TaxonomyStore};
use pressroom_entity::taxonomy::{TaxonomyKind, TaxonomyRef};

use crate::asset::{AssetPipeline, AssociationSyncer};
use crate::context::EditContext;
use crate::post::TaxonomySyncer;

/// One edit submission for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    /// Post title.
    pub title: String,
    /// Requested slug; adjusted if already taken in the scope.
    pub slug: String,
    /// Raw submitted content.
    pub content: String,
    /// Optional excerpt.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Optional SEO meta description.
    #[serde(default)]
    pub meta_description: Option<String>,
    /// Optional SEO focus keyword.
    #[serde(default)]
    pub focus_keyword: Option<String>,
    /// Requested publication status; honored only for authorized actors.
    #[serde(default)]
    pub status: Option<PostStatus>,
    /// Whether commenting is enabled.
    #[serde(default = "default_allow_comments")]
    pub allow_comments: bool,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Whether to record a redirect when a live post's slug or tenant
    /// changes.
    #[serde(default)]
    pub make_redirect: bool,
    /// Images referenced by the edit, in submission order.
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
    /// Tags after this edit (full replace).
    #[serde(default)]
    pub tags: Vec<TaxonomyRef>,
    /// Categories after this edit (full replace).
    #[serde(default)]
    pub categories: Vec<TaxonomyRef>,
}

fn default_allow_comments() -> bool {
    true
}

/// Orchestrates post edits: renders the body, runs the asset pipeline,
/// settles the slug, persists the post, then syncs associations and
/// taxonomy.
///
/// Callers must serialize concurrent edits of the same post.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    pipeline: AssetPipeline,
    associations: AssociationSyncer,
    taxonomy: TaxonomySyncer,
    gate: Arc<dyn PermissionGate>,
    redirects: Arc<dyn RedirectRecorder>,
    renderer: Arc<dyn BodyRenderer>,
    scaled_dir_name: String,
}

impl PostService {
    /// Wire up the service over its stores and host collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        posts: Arc<dyn PostStore>,
        assets: Arc<dyn AssetStore>,
        taxonomy: Arc<dyn TaxonomyStore>,
        gate: Arc<dyn PermissionGate>,
        redirects: Arc<dyn RedirectRecorder>,
        renderer: Arc<dyn BodyRenderer>,
        config: StorageConfig,
    ) -> Self {
        Self {
            pipeline: AssetPipeline::new(
                provider,
                assets.clone(),
                posts.clone(),
                config.clone(),
            ),
            associations: AssociationSyncer::new(assets),
            taxonomy: TaxonomySyncer::new(taxonomy),
            posts,
            gate,
            redirects,
            renderer,
            scaled_dir_name: config.scaled_dir_name,
        }
    }

    /// Create a new post from the request.
    pub async fn create(&self, ctx: &EditContext, request: UpdatePostRequest) -> AppResult<Post> {
        self.update(ctx, Post::draft(ctx.scope.id), request).await
    }

    /// Apply one edit submission to `post`.
    ///
    /// The post row is saved only after the asset pipeline completes, so a
    /// failed edit never leaves a half-updated post record; files already
    /// moved by the pipeline stay moved.
    pub async fn update(
        &self,
        ctx: &EditContext,
        mut post: Post,
        request: UpdatePostRequest,
    ) -> AppResult<Post> {
        let previous_slug = post.slug.clone();
        let previous_scope = post.scope_id;
        let previous_status = post.status;

        post.scope_id = ctx.scope.id;
        post.title = request.title;
        post.content_raw = request.content.clone();
        post.excerpt = request.excerpt;
        post.meta_description = request.meta_description;
        post.focus_keyword = request.focus_keyword;
        post.allow_comments = request.allow_comments;
        post.published_at = request.published_at;

        // Status changes require authorization; unauthorized actors keep
        // the post's current status.
        if let Some(status) = request.status {
            if self.gate.can_modify_status(ctx.actor_id).await? {
                post.status = status;
            } else {
                debug!(actor_id = %ctx.actor_id, "Actor may not modify status, keeping current");
            }
        }

        let scaled_dir = format!("/{}/{}", ctx.scope.asset_dir(), self.scaled_dir_name);
        let rendered = self
            .renderer
            .render(&request.content, &post.title, &scaled_dir)?;

        let outcome = self
            .pipeline
            .process(ctx, &post, &request.images, rendered)
            .await?;
        post.content_html = outcome.body;

        post.slug = self.settle_slug(ctx, &request.slug, &post).await?;

        let slug_changed = !previous_slug.is_empty() && post.slug != previous_slug;
        let scope_changed = previous_scope != post.scope_id;
        if (slug_changed || scope_changed)
            && request.make_redirect
            && (post.is_published() || previous_status == PostStatus::Publish)
        {
            let pattern = format!("/blog/{previous_slug}");
            let target = format!("https://{}/blog/{}", ctx.scope.domain, post.slug);
            self.redirects.record(previous_scope, &pattern, &target).await?;
        }

        let post = self.posts.save(&post).await?;

        self.associations.sync(post.id, &outcome.links).await?;
        self.taxonomy
            .sync(TaxonomyKind::Category, post.id, ctx.scope.id, &request.categories)
            .await?;
        self.taxonomy
            .sync(TaxonomyKind::Tag, post.id, ctx.scope.id, &request.tags)
            .await?;

        info!(
            post_id = %post.id,
            scope_id = %post.scope_id,
            slug = %post.slug,
            images = outcome.links.len(),
            "Saved post edit"
        );
        Ok(post)
    }

    /// Keep the requested slug when free; otherwise append a
    /// seconds-resolution timestamp so the save still succeeds.
    async fn settle_slug(
        &self,
        ctx: &EditContext,
        requested: &str,
        post: &Post,
    ) -> AppResult<String> {
        if !self
            .posts
            .slug_in_use(ctx.scope.id, requested, post.id)
            .await?
        {
            return Ok(requested.to_string());
        }

        let suffix = ctx.request_time.format("%Y-%m-%d-%H-%M-%S");
        let adjusted = format!("{requested}-{suffix}");
        debug!(requested, adjusted, "Slug already in use, adjusted");
        Ok(adjusted)
    }
}
