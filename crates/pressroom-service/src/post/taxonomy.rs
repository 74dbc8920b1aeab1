//! Tag and category synchronization.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use pressroom_core::result::AppResult;
use pressroom_entity::store::TaxonomyStore;
use pressroom_entity::taxonomy::{TaxonomyKind, TaxonomyRef};

/// Replaces a post's term set for one taxonomy kind, creating terms that
/// do not exist yet. Like asset associations, the sync is a full replace.
#[derive(Clone)]
pub struct TaxonomySyncer {
    store: Arc<dyn TaxonomyStore>,
}

impl TaxonomySyncer {
    /// Create a new syncer over the given taxonomy store.
    pub fn new(store: Arc<dyn TaxonomyStore>) -> Self {
        Self { store }
    }

    /// Resolve each reference to a term id — creating new terms on the
    /// fly — and replace the post's term set with the result.
    pub async fn sync(
        &self,
        kind: TaxonomyKind,
        post_id: Uuid,
        scope_id: Uuid,
        refs: &[TaxonomyRef],
    ) -> AppResult<()> {
        let mut term_ids = Vec::with_capacity(refs.len());
        for r in refs {
            let id = match r {
                TaxonomyRef::Existing(id) => *id,
                TaxonomyRef::New(name) => {
                    self.store
                        .create_term(kind, scope_id, name, &slugify(name))
                        .await?
                }
            };
            term_ids.push(id);
        }

        self.store
            .replace_post_terms(kind, post_id, scope_id, &term_ids)
            .await?;
        debug!(%post_id, %kind, count = term_ids.len(), "Replaced post terms");
        Ok(())
    }
}

/// URL-safe slug for a term name: lowercase, runs of non-alphanumerics
/// collapsed to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Church History"), "church-history");
        assert_eq!(slugify("  Faith & Hope  "), "faith-hope");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("Ünïcode Náme"), "ünïcode-náme");
    }
}
