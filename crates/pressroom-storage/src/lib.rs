//! # pressroom-storage
//!
//! Filesystem-facing crate for PressRoom: the local storage provider that
//! implements [`pressroom_core::traits::storage::StorageProvider`], and the
//! scaled-variant generator built on the `image` crate.

pub mod providers;
pub mod thumbnail;

pub use providers::local::LocalStorageProvider;
pub use thumbnail::generator::ThumbnailGenerator;
