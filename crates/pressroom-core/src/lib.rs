//! # pressroom-core
//!
//! Core crate for PressRoom. Contains the trait seams (storage provider,
//! host collaborators), configuration schemas, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other PressRoom crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
