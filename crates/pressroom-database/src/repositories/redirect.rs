//! Redirect rule repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_core::traits::host::RedirectRecorder;

/// Repository persisting redirect rules for moved or re-scoped posts.
#[derive(Debug, Clone)]
pub struct RedirectRepository {
    pool: PgPool,
}

impl RedirectRepository {
    /// Create a new redirect repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRecorder for RedirectRepository {
    async fn record(&self, scope_id: Uuid, pattern: &str, target: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO redirects (id, scope_id, pattern, redirect) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(scope_id)
            .bind(pattern)
            .bind(target)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to record redirect", e)
            })?;

        info!(%scope_id, pattern, target, "Recorded redirect rule");
        Ok(())
    }
}
