//! Taxonomy (tag/category) value types.

pub mod model;

pub use model::{TaxonomyKind, TaxonomyRef};
