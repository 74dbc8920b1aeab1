//! End-to-end pipeline runs against a temp-directory provider and
//! in-memory stores.

mod support;

use std::sync::Arc;

use uuid::Uuid;

use pressroom_core::config::storage::StorageConfig;
use pressroom_core::error::ErrorKind;
use pressroom_core::traits::storage::StorageProvider;
use pressroom_entity::asset::{Asset, ImageDescriptor};
use pressroom_entity::post::{Post, PostStatus};
use pressroom_entity::store::AssetStore;
use pressroom_service::asset::AssetPipeline;
use pressroom_service::context::EditContext;

use support::{MemoryAssetStore, MemoryPostStore, png_bytes, scope, temp_provider};

const STAGING: &str = "assets/shared/blog/upload";

struct Fixture {
    pipeline: AssetPipeline,
    assets: Arc<MemoryAssetStore>,
    posts: Arc<MemoryPostStore>,
    provider: Arc<dyn StorageProvider>,
}

async fn fixture(dir: &tempfile::TempDir) -> Fixture {
    let provider = temp_provider(dir).await;
    let assets = Arc::new(MemoryAssetStore::default());
    let posts = Arc::new(MemoryPostStore::default());
    let pipeline = AssetPipeline::new(
        provider.clone(),
        assets.clone(),
        posts.clone(),
        StorageConfig::default(),
    );
    Fixture {
        pipeline,
        assets,
        posts,
        provider,
    }
}

fn descriptor(original: &str, filename: &str, label: &str) -> ImageDescriptor {
    ImageDescriptor {
        original: original.to_string(),
        filename: filename.to_string(),
        label: label.to_string(),
        scaled_width: 0,
        scaled_height: 0,
        is_default: false,
    }
}

#[tokio::test]
async fn test_fresh_upload_settles_into_tenant_directory() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let scope = scope("www.example.org");
    let ctx = EditContext::new(Uuid::new_v4(), scope.clone(), None);

    let mut post = Post::draft(scope.id);
    post.status = PostStatus::Publish;
    fx.posts.insert(&post);

    fx.provider
        .write(&format!("{STAGING}/photo.png"), png_bytes(40, 30))
        .await
        .unwrap();
    fx.provider
        .write(
            &format!("{STAGING}/uploadThumbs/photo.png"),
            png_bytes(19, 19),
        )
        .await
        .unwrap();

    let mut d = descriptor("photo.png", "header.png", "A header");
    d.scaled_width = 16;
    d.scaled_height = 12;
    d.is_default = true;

    let body = "Intro ![photo.png](blog/upload/photo.png)".to_string();
    let outcome = fx
        .pipeline
        .process(&ctx, &post, &[d], body)
        .await
        .unwrap();

    // File moved out of staging into the tenant directory.
    assert!(!fx
        .provider
        .exists(&format!("{STAGING}/photo.png"))
        .await
        .unwrap());
    assert!(fx
        .provider
        .exists("assets/example/blog/header.png")
        .await
        .unwrap());
    // Cropped variant at the conventional path with the exact dimensions.
    assert!(fx
        .provider
        .exists("assets/example/blog/scaled/header.png")
        .await
        .unwrap());
    let scaled = fx
        .provider
        .read_bytes("assets/example/blog/scaled/header.png")
        .await
        .unwrap();
    let (w, h) = pressroom_storage::thumbnail::generator::probe_dimensions(&scaled).unwrap();
    assert_eq!((w, h), (16, 12));

    // Upload preview thumb is gone.
    assert!(!fx
        .provider
        .exists(&format!("{STAGING}/uploadThumbs/photo.png"))
        .await
        .unwrap());

    // Body: staging prefix stripped, filename replaced, alt normalized.
    assert_eq!(outcome.body, "Intro ![A header](blog/header.png)");

    // Asset record saved with the final name and geometry.
    let asset = fx.assets.asset_by_filename("header.png").unwrap();
    assert_eq!(asset.alt_text, "A header");
    assert_eq!((asset.scaled_width, asset.scaled_height), (16, 12));
    assert_eq!(
        asset.scaled_path.as_deref(),
        Some("assets/example/blog/scaled/header.png")
    );

    // One association link, flagged default, pointing at the saved record.
    assert_eq!(outcome.links.len(), 1);
    assert!(outcome.links[0].is_default);
    assert_eq!(outcome.links[0].asset_id, asset.id);
}

#[tokio::test]
async fn test_settled_image_only_regenerates_variant() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let scope = scope("www.example.org");
    let ctx = EditContext::new(Uuid::new_v4(), scope.clone(), None);

    let post = Post::draft(scope.id);
    fx.posts.insert(&post);

    let tenant = "assets/example/blog";
    let original = png_bytes(40, 30);
    fx.provider
        .write(&format!("{tenant}/photo.png"), original.clone())
        .await
        .unwrap();

    let mut asset = Asset::detached("photo.png");
    asset.alt_text = "old".into();
    fx.assets.attach(&asset, scope.id, post.id, false);

    let outcome = fx
        .pipeline
        .process(
            &ctx,
            &post,
            &[descriptor("photo.png", "photo.png", "new label")],
            "![x](photo.png)".to_string(),
        )
        .await
        .unwrap();

    // No move happened; no crop requested, so the variant is a full copy.
    assert!(fx.provider.exists(&format!("{tenant}/photo.png")).await.unwrap());
    let copied = fx
        .provider
        .read_bytes(&format!("{tenant}/scaled/photo.png"))
        .await
        .unwrap();
    assert_eq!(copied, original);

    // Existing record reused and updated in place.
    assert_eq!(outcome.links[0].asset_id, asset.id);
    let updated = fx.assets.asset(asset.id).unwrap();
    assert_eq!(updated.alt_text, "new label");
    assert_eq!(outcome.body, "![new label](photo.png)");
}

#[tokio::test]
async fn test_collision_renames_occupant_and_keeps_it_reachable() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let scope = scope("www.example.org");
    let ctx = EditContext::new(Uuid::new_v4(), scope.clone(), None);

    let post = Post::draft(scope.id);
    fx.posts.insert(&post);
    let mut revision = Post::draft(scope.id);
    revision.status = PostStatus::Revision;
    revision.revision_of = Some(post.id);
    fx.posts.insert(&revision);

    let tenant = "assets/example/blog";
    // The occupant: attached to the revision snapshot, sitting at the
    // destination with a scaled variant.
    let occupant_bytes = png_bytes(10, 10);
    fx.provider
        .write(&format!("{tenant}/header.png"), occupant_bytes.clone())
        .await
        .unwrap();
    fx.provider
        .write(&format!("{tenant}/scaled/header.png"), occupant_bytes.clone())
        .await
        .unwrap();
    let occupant = Asset::detached("header.png");
    fx.assets.attach(&occupant, scope.id, revision.id, false);

    // The incoming image, staged.
    fx.provider
        .write(&format!("{STAGING}/new.png"), png_bytes(40, 30))
        .await
        .unwrap();

    let outcome = fx
        .pipeline
        .process(
            &ctx,
            &post,
            &[descriptor("new.png", "header.png", "L")],
            String::new(),
        )
        .await
        .unwrap();

    // Occupant's record now carries the collision name and its files moved
    // with it, scaled variant included.
    let renamed = fx.assets.asset(occupant.id).unwrap();
    assert!(renamed.filename.starts_with("header-rev"));
    assert!(renamed.filename.ends_with(".png"));
    assert!(fx
        .provider
        .exists(&format!("{tenant}/{}", renamed.filename))
        .await
        .unwrap());
    assert!(fx
        .provider
        .exists(&format!("{tenant}/scaled/{}", renamed.filename))
        .await
        .unwrap());

    // Incoming image took the contested name under its own record.
    assert!(fx.provider.exists(&format!("{tenant}/header.png")).await.unwrap());
    let incoming = fx.assets.asset(outcome.links[0].asset_id).unwrap();
    assert_eq!(incoming.filename, "header.png");
    assert_ne!(incoming.id, occupant.id);
}

#[tokio::test]
async fn test_repeated_collisions_keep_distinct_historical_names() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let scope = scope("www.example.org");
    let ctx = EditContext::new(Uuid::new_v4(), scope.clone(), None);

    let post = Post::draft(scope.id);
    fx.posts.insert(&post);

    let tenant = "assets/example/blog";
    fx.provider
        .write(&format!("{tenant}/header.png"), png_bytes(10, 10))
        .await
        .unwrap();
    let occupant = Asset::detached("header.png");
    fx.assets.attach(&occupant, scope.id, post.id, false);

    // Two edits back to back, each colliding on the same target name;
    // both typically land within the same wall-clock second.
    for upload in ["new1.png", "new2.png"] {
        fx.provider
            .write(&format!("{STAGING}/{upload}"), png_bytes(20, 20))
            .await
            .unwrap();
        let outcome = fx
            .pipeline
            .process(
                &ctx,
                &post,
                &[descriptor(upload, "header.png", "L")],
                String::new(),
            )
            .await
            .unwrap();
        fx.assets
            .replace_post_assets(post.id, &outcome.links)
            .await
            .unwrap();
    }

    // Both displaced files survive under distinct collision names.
    let rev_files: Vec<String> = std::fs::read_dir(dir.path().join(tenant))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("header-rev"))
        .collect();
    assert_eq!(rev_files.len(), 2);
    assert_ne!(rev_files[0], rev_files[1]);
    assert!(fx.provider.exists(&format!("{tenant}/header.png")).await.unwrap());
}

#[tokio::test]
async fn test_collision_with_own_record_detaches_incoming() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let origin = scope("www.origin.org");
    let dest = scope("www.dest.org");
    let ctx = EditContext::new(Uuid::new_v4(), dest.clone(), Some(origin.clone()));

    let post = Post::draft(dest.id);
    fx.posts.insert(&post);

    // Same filename exists in both tenant directories; the destination copy
    // belongs to this very post.
    fx.provider
        .write("assets/origin/blog/photo.png", png_bytes(40, 30))
        .await
        .unwrap();
    fx.provider
        .write("assets/dest/blog/photo.png", png_bytes(10, 10))
        .await
        .unwrap();
    let existing = Asset::detached("photo.png");
    fx.assets.attach(&existing, dest.id, post.id, false);

    let outcome = fx
        .pipeline
        .process(
            &ctx,
            &post,
            &[descriptor("photo.png", "photo.png", "L")],
            String::new(),
        )
        .await
        .unwrap();

    // The old record stays with the renamed historical file; the moved
    // image continues under a fresh record.
    let old = fx.assets.asset(existing.id).unwrap();
    assert!(old.filename.starts_with("photo-rev"));
    let fresh = fx.assets.asset(outcome.links[0].asset_id).unwrap();
    assert_ne!(fresh.id, existing.id);
    assert_eq!(fresh.filename, "photo.png");
    assert!(fx
        .provider
        .exists("assets/dest/blog/photo.png")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_missing_source_aborts_and_keeps_completed_moves() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let scope = scope("www.example.org");
    let ctx = EditContext::new(Uuid::new_v4(), scope.clone(), None);

    let post = Post::draft(scope.id);
    fx.posts.insert(&post);

    fx.provider
        .write(&format!("{STAGING}/first.png"), png_bytes(8, 8))
        .await
        .unwrap();

    let err = fx
        .pipeline
        .process(
            &ctx,
            &post,
            &[
                descriptor("first.png", "first.png", "a"),
                descriptor("ghost.png", "ghost.png", "b"),
            ],
            String::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::SourceNotFound);
    assert!(err.message.contains("ghost.png"));
    // The first image's completed move is not rolled back.
    assert!(fx
        .provider
        .exists("assets/example/blog/first.png")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_scope_transfer_moves_between_tenant_directories() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(&dir).await;
    let origin = scope("www.origin.org");
    let dest = scope("www.dest.org");
    let ctx = EditContext::new(Uuid::new_v4(), dest.clone(), Some(origin.clone()));

    let post = Post::draft(dest.id);
    fx.posts.insert(&post);

    fx.provider
        .write("assets/origin/blog/photo.png", png_bytes(20, 20))
        .await
        .unwrap();
    fx.provider
        .write("assets/origin/blog/scaled/photo.png", png_bytes(5, 5))
        .await
        .unwrap();

    fx.pipeline
        .process(
            &ctx,
            &post,
            &[descriptor("photo.png", "photo.png", "L")],
            String::new(),
        )
        .await
        .unwrap();

    assert!(!fx
        .provider
        .exists("assets/origin/blog/photo.png")
        .await
        .unwrap());
    assert!(fx
        .provider
        .exists("assets/dest/blog/photo.png")
        .await
        .unwrap());
    // Stale origin variant swept, fresh variant generated at destination.
    assert!(!fx
        .provider
        .exists("assets/origin/blog/scaled/photo.png")
        .await
        .unwrap());
    assert!(fx
        .provider
        .exists("assets/dest/blog/scaled/photo.png")
        .await
        .unwrap());
}
