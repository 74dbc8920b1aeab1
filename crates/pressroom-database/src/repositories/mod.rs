//! Repository implementations.

pub mod asset;
pub mod post;
pub mod redirect;
pub mod scope;
pub mod taxonomy;
