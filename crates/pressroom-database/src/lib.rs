//! # pressroom-database
//!
//! PostgreSQL persistence for PressRoom: the connection pool that
//! constructs the repositories and applies migrations, plus the sqlx
//! repositories implementing the store traits from `pressroom-entity`.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
