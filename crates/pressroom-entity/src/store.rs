//! Persistence seams for the entity models.
//!
//! The service layer talks to these traits only; `pressroom-database`
//! implements them over PostgreSQL and the service test suites implement
//! them in memory. This mirrors how the storage provider trait lives in
//! `pressroom-core` with implementations elsewhere.

use async_trait::async_trait;
use uuid::Uuid;

use pressroom_core::result::AppResult;

use crate::asset::{Asset, AssetLink};
use crate::post::Post;
use crate::taxonomy::TaxonomyKind;

/// Persistence operations for [`Asset`] records and their post
/// associations.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Find an asset by current filename that is attached to a post or a
    /// page belonging to the given scope. Returns the first match.
    async fn find_attached_by_filename(
        &self,
        filename: &str,
        scope_id: Uuid,
    ) -> AppResult<Vec<Asset>>;

    /// Find assets by current filename attached to the given post or any
    /// of the given revision rows. Used during collision resolution;
    /// revision-archive filtering happens at the call site.
    async fn find_post_occupants(
        &self,
        filename: &str,
        post_id: Uuid,
        revision_ids: &[Uuid],
    ) -> AppResult<Vec<Asset>>;

    /// Insert or update an asset record (keyed by its client-generated id)
    /// and return the persisted row.
    async fn save(&self, asset: &Asset) -> AppResult<Asset>;

    /// Replace the post's entire asset association set with exactly the
    /// given links. A full replace, not a merge.
    async fn replace_post_assets(&self, post_id: Uuid, links: &[AssetLink]) -> AppResult<()>;

    /// Current association set of a post.
    async fn post_asset_links(&self, post_id: Uuid) -> AppResult<Vec<AssetLink>>;
}

/// Persistence operations for [`Post`] rows and their revision history.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Find a post by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// Ids of all revision snapshots of the given live post.
    async fn revision_ids(&self, post_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Whether a live post other than `exclude` already uses this slug in
    /// the scope.
    async fn slug_in_use(&self, scope_id: Uuid, slug: &str, exclude: Uuid) -> AppResult<bool>;

    /// Insert or update a post row and return the persisted version.
    async fn save(&self, post: &Post) -> AppResult<Post>;
}

/// Persistence operations for taxonomy terms and their post links.
#[async_trait]
pub trait TaxonomyStore: Send + Sync + 'static {
    /// Create a term of the given kind and return its id.
    async fn create_term(
        &self,
        kind: TaxonomyKind,
        scope_id: Uuid,
        name: &str,
        slug: &str,
    ) -> AppResult<Uuid>;

    /// Replace the post's term set for one taxonomy kind with exactly the
    /// given term ids, all scoped to `scope_id`.
    async fn replace_post_terms(
        &self,
        kind: TaxonomyKind,
        post_id: Uuid,
        scope_id: Uuid,
        term_ids: &[Uuid],
    ) -> AppResult<()>;
}
