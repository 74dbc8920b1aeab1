//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::PostStatus;

/// A versioned editorial document owned by one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// The owning tenant.
    pub scope_id: Uuid,
    /// Post title.
    pub title: String,
    /// URL slug, unique among live posts within the scope.
    pub slug: String,
    /// Publication status.
    pub status: PostStatus,
    /// Raw submitted content.
    pub content_raw: String,
    /// Rendered body the pipeline rewrites image references in.
    pub content_html: String,
    /// Optional excerpt.
    pub excerpt: Option<String>,
    /// Optional SEO meta description.
    pub meta_description: Option<String>,
    /// Optional SEO focus keyword.
    pub focus_keyword: Option<String>,
    /// Whether commenting is enabled.
    pub allow_comments: bool,
    /// Publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
    /// For revision rows, the live post this is a snapshot of.
    pub revision_of: Option<Uuid>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Construct a new, unsaved draft in the given scope.
    pub fn draft(scope_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            scope_id,
            title: String::new(),
            slug: String::new(),
            status: PostStatus::Pending,
            content_raw: String::new(),
            content_html: String::new(),
            excerpt: None,
            meta_description: None,
            focus_keyword: None,
            allow_comments: true,
            published_at: None,
            revision_of: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this row is an immutable revision snapshot.
    pub fn is_revision(&self) -> bool {
        self.status == PostStatus::Revision
    }

    /// Whether this post is live and published.
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Publish
    }
}
