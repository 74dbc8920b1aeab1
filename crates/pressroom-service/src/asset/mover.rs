//! Asset move execution.

use std::sync::Arc;

use tracing::{debug, info};

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_core::traits::storage::StorageProvider;

use super::planner::PlannedMove;

/// Executes planned asset moves and sweeps up orphaned scaled variants.
#[derive(Clone)]
pub struct AssetMover {
    provider: Arc<dyn StorageProvider>,
    scaled_dir_name: String,
}

impl AssetMover {
    /// Create a new mover.
    pub fn new(provider: Arc<dyn StorageProvider>, scaled_dir_name: &str) -> Self {
        Self {
            provider,
            scaled_dir_name: scaled_dir_name.to_string(),
        }
    }

    /// Move the file from `plan.source` to `plan.dest`.
    ///
    /// After a successful move the scaled variants left behind under the
    /// old name (and any stale variants already under the new one) are
    /// deleted best-effort, since the pipeline regenerates the variant
    /// right after. When `preserve_scaled` is set — a collision was just
    /// resolved at the destination — the sweep is skipped so the renamed
    /// occupant's variants survive.
    pub async fn relocate(
        &self,
        plan: &PlannedMove,
        original: &str,
        target: &str,
        preserve_scaled: bool,
    ) -> AppResult<()> {
        self.provider
            .rename(&plan.source, &plan.dest)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::MoveFailed,
                    format!("Failed to move {original} to {}", plan.dest),
                    e,
                )
            })?;
        info!(source = %plan.source, dest = %plan.dest, "Moved image into place");

        if preserve_scaled {
            return Ok(());
        }

        let mut candidates = vec![
            format!("{}/{}/{original}", plan.origin_dir, self.scaled_dir_name),
            format!("{}/{}/{target}", plan.origin_dir, self.scaled_dir_name),
            format!("{}/{}/{original}", plan.dest_dir, self.scaled_dir_name),
            format!("{}/{}/{target}", plan.dest_dir, self.scaled_dir_name),
        ];
        candidates.sort();
        candidates.dedup();

        for path in candidates {
            if let Err(e) = self.provider.delete(&path).await {
                debug!(path, error = %e, "Orphan scaled variant sweep failed");
            }
        }
        Ok(())
    }
}
