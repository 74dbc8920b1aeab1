//! Taxonomy repository implementation.
//!
//! Tags and categories live in separate tables with identical shapes. The
//! table names are selected by an explicit match on [`TaxonomyKind`], never
//! by caller-supplied strings.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_entity::store::TaxonomyStore;
use pressroom_entity::taxonomy::TaxonomyKind;

/// Repository for taxonomy terms and their post links.
#[derive(Debug, Clone)]
pub struct TaxonomyRepository {
    pool: PgPool,
}

impl TaxonomyRepository {
    /// Create a new taxonomy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn term_table(kind: TaxonomyKind) -> &'static str {
        match kind {
            TaxonomyKind::Tag => "tags",
            TaxonomyKind::Category => "categories",
        }
    }

    fn link_table(kind: TaxonomyKind) -> (&'static str, &'static str) {
        match kind {
            TaxonomyKind::Tag => ("post_tags", "tag_id"),
            TaxonomyKind::Category => ("post_categories", "category_id"),
        }
    }
}

#[async_trait]
impl TaxonomyStore for TaxonomyRepository {
    async fn create_term(
        &self,
        kind: TaxonomyKind,
        scope_id: Uuid,
        name: &str,
        slug: &str,
    ) -> AppResult<Uuid> {
        let table = Self::term_table(kind);
        let id = Uuid::new_v4();

        sqlx::query(&format!(
            "INSERT INTO {table} (id, scope_id, name, slug) VALUES ($1, $2, $3, $4)"
        ))
        .bind(id)
        .bind(scope_id)
        .bind(name)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Failed to create {kind}"), e)
        })?;

        Ok(id)
    }

    async fn replace_post_terms(
        &self,
        kind: TaxonomyKind,
        post_id: Uuid,
        scope_id: Uuid,
        term_ids: &[Uuid],
    ) -> AppResult<()> {
        let (table, term_col) = Self::link_table(kind);

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(&format!("DELETE FROM {table} WHERE post_id = $1"))
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear post terms", e)
            })?;

        for term_id in term_ids {
            sqlx::query(&format!(
                "INSERT INTO {table} (post_id, {term_col}, scope_id) VALUES ($1, $2, $3)"
            ))
            .bind(post_id)
            .bind(term_id)
            .bind(scope_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to link post term", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit post terms", e)
        })
    }
}
