//! Tenant scope entities.

pub mod model;

pub use model::Scope;
