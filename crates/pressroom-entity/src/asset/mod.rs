//! Image asset entities.

pub mod descriptor;
pub mod link;
pub mod model;

pub use descriptor::ImageDescriptor;
pub use link::AssetLink;
pub use model::Asset;
