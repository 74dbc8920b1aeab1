//! Post repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use pressroom_core::error::{AppError, ErrorKind};
use pressroom_core::result::AppResult;
use pressroom_entity::post::Post;
use pressroom_entity::store::PostStore;

/// Repository for post rows and revision lookups.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    async fn revision_ids(&self, post_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM posts WHERE revision_of = $1 ORDER BY updated_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list revisions", e))
    }

    async fn slug_in_use(&self, scope_id: Uuid, slug: &str, exclude: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM posts \
             WHERE scope_id = $1 AND slug = $2 AND id <> $3 AND status <> 'revision')",
        )
        .bind(scope_id)
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check slug", e))
    }

    async fn save(&self, post: &Post) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts \
             (id, scope_id, title, slug, status, content_raw, content_html, excerpt, \
              meta_description, focus_keyword, allow_comments, published_at, revision_of, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                 scope_id = EXCLUDED.scope_id, \
                 title = EXCLUDED.title, \
                 slug = EXCLUDED.slug, \
                 status = EXCLUDED.status, \
                 content_raw = EXCLUDED.content_raw, \
                 content_html = EXCLUDED.content_html, \
                 excerpt = EXCLUDED.excerpt, \
                 meta_description = EXCLUDED.meta_description, \
                 focus_keyword = EXCLUDED.focus_keyword, \
                 allow_comments = EXCLUDED.allow_comments, \
                 published_at = EXCLUDED.published_at, \
                 revision_of = EXCLUDED.revision_of, \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(post.id)
        .bind(post.scope_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(post.status)
        .bind(&post.content_raw)
        .bind(&post.content_html)
        .bind(&post.excerpt)
        .bind(&post.meta_description)
        .bind(&post.focus_keyword)
        .bind(post.allow_comments)
        .bind(post.published_at)
        .bind(post.revision_of)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save post", e))
    }
}
