//! The asset-reconciliation pipeline.
//!
//! Each module covers one stage of the per-image reconciliation that runs
//! on every post edit: resolve the database record, plan the filesystem
//! move, clear destination collisions, execute the move, regenerate the
//! scaled variant, and rewrite body references. [`pipeline::AssetPipeline`]
//! wires the stages together and runs them in submission order.

pub mod associations;
pub mod collision;
pub mod mover;
pub mod pipeline;
pub mod planner;
pub mod resolver;
pub mod rewriter;
pub mod upload;

pub use associations::AssociationSyncer;
pub use collision::CollisionResolver;
pub use mover::AssetMover;
pub use pipeline::{AssetPipeline, PipelineOutcome};
pub use planner::{PathPlanner, PlannedMove};
pub use resolver::AssetResolver;
pub use rewriter::ContentRewriter;
pub use upload::{StagedUpload, UploadService};
