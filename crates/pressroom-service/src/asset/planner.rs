//! Filesystem move planning.

use std::sync::Arc;

use tracing::debug;

use pressroom_core::error::AppError;
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;

/// A concrete source and destination for one image move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Where the file currently lives, relative to the provider root.
    pub source: String,
    /// Where the file must end up.
    pub dest: String,
    /// Tenant directory the source candidates were drawn from.
    pub origin_dir: String,
    /// Destination tenant directory.
    pub dest_dir: String,
}

impl PlannedMove {
    /// Whether the file actually has to change location. Re-saving a post
    /// without touching an image yields a no-op plan.
    pub fn requires_move(&self) -> bool {
        self.source != self.dest
    }
}

/// Plans the source and destination paths for each image in an edit.
///
/// Source candidates are probed in order: the shared staging directory
/// first (fresh uploads), then the originating tenant directory (already
/// assigned images, possibly being transferred between tenants). A file
/// found in neither location aborts the edit.
#[derive(Clone)]
pub struct PathPlanner {
    provider: Arc<dyn StorageProvider>,
    staging_dir: String,
}

impl PathPlanner {
    /// Create a new planner probing `staging_dir` before tenant directories.
    pub fn new(provider: Arc<dyn StorageProvider>, staging_dir: &str) -> Self {
        Self {
            provider,
            staging_dir: staging_dir.to_string(),
        }
    }

    /// Resolve the move for one image: `original` is the filename the file
    /// currently carries, `target` the filename it must have inside
    /// `dest_dir` afterwards.
    pub async fn plan(
        &self,
        origin_dir: &str,
        dest_dir: &str,
        original: &str,
        target: &str,
    ) -> AppResult<PlannedMove> {
        let staged = format!("{}/{original}", self.staging_dir);
        let assigned = format!("{origin_dir}/{original}");

        let source = if self.provider.exists(&staged).await? {
            staged
        } else if self.provider.exists(&assigned).await? {
            assigned
        } else {
            return Err(AppError::source_not_found(original));
        };

        let plan = PlannedMove {
            source,
            dest: format!("{dest_dir}/{target}"),
            origin_dir: origin_dir.to_string(),
            dest_dir: dest_dir.to_string(),
        };
        debug!(source = %plan.source, dest = %plan.dest, "Planned image move");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pressroom_core::error::ErrorKind;
    use pressroom_storage::providers::local::LocalStorageProvider;

    const STAGING: &str = "assets/shared/blog/upload";

    async fn planner_in(dir: &tempfile::TempDir) -> (PathPlanner, Arc<dyn StorageProvider>) {
        let provider: Arc<dyn StorageProvider> = Arc::new(
            LocalStorageProvider::new(dir.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        (PathPlanner::new(provider.clone(), STAGING), provider)
    }

    #[tokio::test]
    async fn test_staging_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, provider) = planner_in(&dir).await;

        provider
            .write(&format!("{STAGING}/photo.jpg"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        provider
            .write("assets/example/blog/photo.jpg", Bytes::from_static(b"b"))
            .await
            .unwrap();

        let plan = planner
            .plan("assets/example/blog", "assets/example/blog", "photo.jpg", "final.jpg")
            .await
            .unwrap();
        assert_eq!(plan.source, format!("{STAGING}/photo.jpg"));
        assert_eq!(plan.dest, "assets/example/blog/final.jpg");
        assert!(plan.requires_move());
    }

    #[tokio::test]
    async fn test_falls_back_to_origin_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, provider) = planner_in(&dir).await;

        provider
            .write("assets/example/blog/photo.jpg", Bytes::from_static(b"b"))
            .await
            .unwrap();

        let plan = planner
            .plan("assets/example/blog", "assets/other/blog", "photo.jpg", "photo.jpg")
            .await
            .unwrap();
        assert_eq!(plan.source, "assets/example/blog/photo.jpg");
        assert_eq!(plan.dest, "assets/other/blog/photo.jpg");
        assert!(plan.requires_move());
    }

    #[tokio::test]
    async fn test_settled_image_is_a_noop_plan() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, provider) = planner_in(&dir).await;

        provider
            .write("assets/example/blog/photo.jpg", Bytes::from_static(b"b"))
            .await
            .unwrap();

        let plan = planner
            .plan("assets/example/blog", "assets/example/blog", "photo.jpg", "photo.jpg")
            .await
            .unwrap();
        assert!(!plan.requires_move());
    }

    #[tokio::test]
    async fn test_missing_everywhere_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let (planner, _) = planner_in(&dir).await;

        let err = planner
            .plan("assets/example/blog", "assets/example/blog", "ghost.jpg", "ghost.jpg")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SourceNotFound);
        assert!(err.message.contains("ghost.jpg"));
    }
}
