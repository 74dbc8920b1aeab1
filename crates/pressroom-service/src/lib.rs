//! # pressroom-service
//!
//! Business logic layer for PressRoom: the asset-reconciliation pipeline
//! that runs on every post edit, and the services that orchestrate it.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references to the trait seams in
//! `pressroom-core` and `pressroom-entity`, so the whole layer runs
//! unchanged against PostgreSQL or against in-memory test doubles.

pub mod asset;
pub mod context;
pub mod post;

pub use asset::{
    AssetMover, AssetPipeline, AssetResolver, AssociationSyncer, CollisionResolver,
    ContentRewriter, PathPlanner, UploadService,
};
pub use context::EditContext;
pub use post::{PostService, TaxonomySyncer, UpdatePostRequest};
