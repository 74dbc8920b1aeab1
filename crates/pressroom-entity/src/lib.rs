//! # pressroom-entity
//!
//! Domain entity models for PressRoom. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! The persistence seams ([`store::AssetStore`], [`store::PostStore`],
//! [`store::TaxonomyStore`]) live here beside the entities they persist;
//! `pressroom-database` provides the PostgreSQL implementations.

pub mod asset;
pub mod post;
pub mod scope;
pub mod store;
pub mod taxonomy;
