//! Scaled-variant generation.

pub mod generator;
