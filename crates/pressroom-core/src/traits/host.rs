//! Host collaborator traits.
//!
//! The asset pipeline runs inside a larger publishing platform. The
//! platform-owned concerns it touches — authorization, redirect rules,
//! body rendering — are consumed through these seams and implemented by
//! the host (or by test doubles).

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Authorization gate consulted before a post's publication status may be
/// changed by an edit.
#[async_trait]
pub trait PermissionGate: Send + Sync + 'static {
    /// Whether the acting user may modify publication status.
    async fn can_modify_status(&self, actor_id: Uuid) -> AppResult<bool>;
}

/// Persists a redirect rule when a live post's slug or tenant changes.
#[async_trait]
pub trait RedirectRecorder: Send + Sync + 'static {
    /// Record a redirect from `pattern` (the old URL pattern, owned by
    /// `scope_id`) to `target` (the new URL).
    async fn record(&self, scope_id: Uuid, pattern: &str, target: &str) -> AppResult<()>;
}

/// Converts submitted raw content into the stored body format.
///
/// Invoked before the asset pipeline runs; the output is the body string
/// the pipeline's content rewriting operates on.
pub trait BodyRenderer: Send + Sync + 'static {
    /// Render `raw` into the stored body format. `default_alt` is used for
    /// image references lacking alt text; `scaled_dir` is the tenant's
    /// scaled-variant directory to root image paths at.
    fn render(&self, raw: &str, default_alt: &str, scaled_dir: &str) -> AppResult<String>;
}
