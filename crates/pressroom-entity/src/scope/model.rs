//! Tenant scope entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An isolated tenant (site) whose posts and assets live under a dedicated
/// directory and are never visible to other tenants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Scope {
    /// Unique scope identifier.
    pub id: Uuid,
    /// Display name of the site.
    pub name: String,
    /// Primary domain of the site, e.g. `www.example.org`.
    pub domain: String,
    /// When the scope was created.
    pub created_at: DateTime<Utc>,
}

impl Scope {
    /// The directory-name component derived from the scope's domain: the
    /// registrable label with any scheme and `www.` prefix stripped
    /// (`https://www.example.org` becomes `example`).
    pub fn dir_component(&self) -> String {
        let host = self
            .domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let host = host.split('/').next().unwrap_or(host);
        let host = host.strip_prefix("www.").unwrap_or(host);
        host.split('.').next().unwrap_or(host).to_lowercase()
    }

    /// Root directory of this tenant's blog assets, relative to the storage
    /// provider root.
    pub fn asset_dir(&self) -> String {
        format!("assets/{}/blog", self.dir_component())
    }
}
