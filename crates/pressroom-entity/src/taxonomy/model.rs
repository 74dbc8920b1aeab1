//! Taxonomy kinds and term references.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which taxonomy a term belongs to. Tags and categories share their sync
/// mechanics but live in separate tables; the kind is an explicit variant,
/// never a runtime-chosen relation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    /// Free-form tags.
    Tag,
    /// Curated categories.
    Category,
}

impl TaxonomyKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A term in an edit submission: either an existing term's id or the name
/// of a term to create on the fly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyRef {
    /// An existing term.
    Existing(Uuid),
    /// A new term to create, by display name.
    New(String),
}
