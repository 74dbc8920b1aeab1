//! In-memory doubles for the persistence and host seams, plus fixture
//! helpers shared by the service integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use pressroom_core::result::AppResult;
use pressroom_core::traits::host::{BodyRenderer, PermissionGate, RedirectRecorder};
use pressroom_core::traits::storage::StorageProvider;
use pressroom_entity::asset::{Asset, AssetLink};
use pressroom_entity::post::Post;
use pressroom_entity::scope::Scope;
use pressroom_entity::store::{AssetStore, PostStore, TaxonomyStore};
use pressroom_entity::taxonomy::TaxonomyKind;
use pressroom_storage::providers::local::LocalStorageProvider;

/// In-memory [`AssetStore`] backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryAssetStore {
    pub assets: Mutex<HashMap<Uuid, Asset>>,
    /// post id -> association links.
    pub post_links: Mutex<HashMap<Uuid, Vec<AssetLink>>>,
    /// Scope each asset is attached under, for the scoped filename lookup.
    pub attached_scope: Mutex<HashMap<Uuid, Uuid>>,
}

impl MemoryAssetStore {
    pub fn attach(&self, asset: &Asset, scope_id: Uuid, post_id: Uuid, is_default: bool) {
        self.assets
            .lock()
            .unwrap()
            .insert(asset.id, asset.clone());
        self.attached_scope
            .lock()
            .unwrap()
            .insert(asset.id, scope_id);
        self.post_links
            .lock()
            .unwrap()
            .entry(post_id)
            .or_default()
            .push(AssetLink::new(asset.id, is_default));
    }

    pub fn asset(&self, id: Uuid) -> Option<Asset> {
        self.assets.lock().unwrap().get(&id).cloned()
    }

    pub fn asset_by_filename(&self, filename: &str) -> Option<Asset> {
        self.assets
            .lock()
            .unwrap()
            .values()
            .find(|a| a.filename == filename)
            .cloned()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn find_attached_by_filename(
        &self,
        filename: &str,
        scope_id: Uuid,
    ) -> AppResult<Vec<Asset>> {
        let scopes = self.attached_scope.lock().unwrap();
        Ok(self
            .assets
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.filename == filename && scopes.get(&a.id) == Some(&scope_id))
            .cloned()
            .collect())
    }

    async fn find_post_occupants(
        &self,
        filename: &str,
        post_id: Uuid,
        revision_ids: &[Uuid],
    ) -> AppResult<Vec<Asset>> {
        let links = self.post_links.lock().unwrap();
        let mut reachable: Vec<Uuid> = Vec::new();
        for pid in std::iter::once(&post_id).chain(revision_ids) {
            if let Some(ls) = links.get(pid) {
                reachable.extend(ls.iter().map(|l| l.asset_id));
            }
        }
        Ok(self
            .assets
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.filename == filename && reachable.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn save(&self, asset: &Asset) -> AppResult<Asset> {
        let mut saved = asset.clone();
        saved.updated_at = Utc::now();
        self.assets
            .lock()
            .unwrap()
            .insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn replace_post_assets(&self, post_id: Uuid, links: &[AssetLink]) -> AppResult<()> {
        self.post_links
            .lock()
            .unwrap()
            .insert(post_id, links.to_vec());
        // Anything linked to a post counts as attached in that post's scope
        // for subsequent lookups; tests set scopes explicitly via attach().
        Ok(())
    }

    async fn post_asset_links(&self, post_id: Uuid) -> AppResult<Vec<AssetLink>> {
        Ok(self
            .post_links
            .lock()
            .unwrap()
            .get(&post_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory [`PostStore`].
#[derive(Default)]
pub struct MemoryPostStore {
    pub posts: Mutex<HashMap<Uuid, Post>>,
}

impl MemoryPostStore {
    pub fn insert(&self, post: &Post) {
        self.posts.lock().unwrap().insert(post.id, post.clone());
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn revision_ids(&self, post_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.revision_of == Some(post_id))
            .map(|p| p.id)
            .collect())
    }

    async fn slug_in_use(&self, scope_id: Uuid, slug: &str, exclude: Uuid) -> AppResult<bool> {
        Ok(self.posts.lock().unwrap().values().any(|p| {
            p.scope_id == scope_id && p.slug == slug && p.id != exclude && !p.is_revision()
        }))
    }

    async fn save(&self, post: &Post) -> AppResult<Post> {
        let mut saved = post.clone();
        saved.updated_at = Utc::now();
        self.posts.lock().unwrap().insert(saved.id, saved.clone());
        Ok(saved)
    }
}

/// In-memory [`TaxonomyStore`] recording created terms and post links.
#[derive(Default)]
pub struct MemoryTaxonomyStore {
    /// (kind, name, slug) per created term id.
    pub terms: Mutex<HashMap<Uuid, (TaxonomyKind, String, String)>>,
    /// (kind, post id) -> term ids.
    pub links: Mutex<HashMap<(TaxonomyKind, Uuid), Vec<Uuid>>>,
}

#[async_trait]
impl TaxonomyStore for MemoryTaxonomyStore {
    async fn create_term(
        &self,
        kind: TaxonomyKind,
        _scope_id: Uuid,
        name: &str,
        slug: &str,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        self.terms
            .lock()
            .unwrap()
            .insert(id, (kind, name.to_string(), slug.to_string()));
        Ok(id)
    }

    async fn replace_post_terms(
        &self,
        kind: TaxonomyKind,
        post_id: Uuid,
        _scope_id: Uuid,
        term_ids: &[Uuid],
    ) -> AppResult<()> {
        self.links
            .lock()
            .unwrap()
            .insert((kind, post_id), term_ids.to_vec());
        Ok(())
    }
}

/// [`PermissionGate`] with a fixed answer.
pub struct FixedGate(pub bool);

#[async_trait]
impl PermissionGate for FixedGate {
    async fn can_modify_status(&self, _actor_id: Uuid) -> AppResult<bool> {
        Ok(self.0)
    }
}

/// [`RedirectRecorder`] capturing recorded rules.
#[derive(Default)]
pub struct RecordingRedirects {
    pub recorded: Mutex<Vec<(Uuid, String, String)>>,
}

#[async_trait]
impl RedirectRecorder for RecordingRedirects {
    async fn record(&self, scope_id: Uuid, pattern: &str, target: &str) -> AppResult<()> {
        self.recorded
            .lock()
            .unwrap()
            .push((scope_id, pattern.to_string(), target.to_string()));
        Ok(())
    }
}

/// [`BodyRenderer`] that passes raw content through unchanged.
pub struct PassthroughRenderer;

impl BodyRenderer for PassthroughRenderer {
    fn render(&self, raw: &str, _default_alt: &str, _scaled_dir: &str) -> AppResult<String> {
        Ok(raw.to_string())
    }
}

/// A scope rooted at the given domain.
pub fn scope(domain: &str) -> Scope {
    Scope {
        id: Uuid::new_v4(),
        name: domain.to_string(),
        domain: domain.to_string(),
        created_at: Utc::now(),
    }
}

/// A local provider rooted at a fresh temp directory.
pub async fn temp_provider(dir: &tempfile::TempDir) -> Arc<dyn StorageProvider> {
    Arc::new(
        LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap(),
    )
}

/// A small valid PNG.
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]));
    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .unwrap();
    Bytes::from(buf)
}
