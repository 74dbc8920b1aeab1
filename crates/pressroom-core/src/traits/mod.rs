//! Trait seams implemented outside this crate.

pub mod host;
pub mod storage;
