//! Post editing services.

pub mod service;
pub mod taxonomy;

pub use service::{PostService, UpdatePostRequest};
pub use taxonomy::{TaxonomySyncer, slugify};
