//! Asset repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_entity::asset::{Asset, AssetLink};
use pressroom_entity::store::AssetStore;

/// Repository for asset records and their post associations.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Create a new asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an asset by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Asset>> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find asset", e))
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    async fn find_attached_by_filename(
        &self,
        filename: &str,
        scope_id: Uuid,
    ) -> AppResult<Vec<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT a.* FROM assets a \
             WHERE a.filename = $1 AND ( \
                 EXISTS (SELECT 1 FROM post_assets pa \
                         JOIN posts p ON p.id = pa.post_id \
                         WHERE pa.asset_id = a.id AND p.scope_id = $2) \
                 OR EXISTS (SELECT 1 FROM page_assets ga \
                            JOIN pages g ON g.id = ga.page_id \
                            WHERE ga.asset_id = a.id AND g.scope_id = $2)) \
             ORDER BY a.updated_at DESC",
        )
        .bind(filename)
        .bind(scope_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find asset by filename", e)
        })
    }

    async fn find_post_occupants(
        &self,
        filename: &str,
        post_id: Uuid,
        revision_ids: &[Uuid],
    ) -> AppResult<Vec<Asset>> {
        sqlx::query_as::<_, Asset>(
            "SELECT DISTINCT a.* FROM assets a \
             JOIN post_assets pa ON pa.asset_id = a.id \
             WHERE a.filename = $1 AND (pa.post_id = $2 OR pa.post_id = ANY($3))",
        )
        .bind(filename)
        .bind(post_id)
        .bind(revision_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find occupant assets", e)
        })
    }

    async fn save(&self, asset: &Asset) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            "INSERT INTO assets \
             (id, filename, alt_text, scaled_width, scaled_height, scaled_path, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                 filename = EXCLUDED.filename, \
                 alt_text = EXCLUDED.alt_text, \
                 scaled_width = EXCLUDED.scaled_width, \
                 scaled_height = EXCLUDED.scaled_height, \
                 scaled_path = EXCLUDED.scaled_path, \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(asset.id)
        .bind(&asset.filename)
        .bind(&asset.alt_text)
        .bind(asset.scaled_width)
        .bind(asset.scaled_height)
        .bind(&asset.scaled_path)
        .bind(asset.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save asset", e))
    }

    async fn replace_post_assets(&self, post_id: Uuid, links: &[AssetLink]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM post_assets WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear associations", e)
            })?;

        for link in links {
            sqlx::query(
                "INSERT INTO post_assets (post_id, asset_id, is_default) VALUES ($1, $2, $3)",
            )
            .bind(post_id)
            .bind(link.asset_id)
            .bind(link.is_default)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert association", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit associations", e)
        })
    }

    async fn post_asset_links(&self, post_id: Uuid) -> AppResult<Vec<AssetLink>> {
        sqlx::query_as::<_, AssetLink>(
            "SELECT asset_id, is_default FROM post_assets WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list associations", e))
    }
}
