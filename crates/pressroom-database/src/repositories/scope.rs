//! Scope repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_entity::scope::Scope;

/// Repository for tenant scopes.
#[derive(Debug, Clone)]
pub struct ScopeRepository {
    pool: PgPool,
}

impl ScopeRepository {
    /// Create a new scope repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a scope by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Scope>> {
        sqlx::query_as::<_, Scope>("SELECT * FROM scopes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find scope", e))
    }

    /// List all scopes.
    pub async fn find_all(&self) -> AppResult<Vec<Scope>> {
        sqlx::query_as::<_, Scope>("SELECT * FROM scopes ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list scopes", e))
    }
}
