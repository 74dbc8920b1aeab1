//! Editorial post entities.

pub mod model;
pub mod status;

pub use model::Post;
pub use status::PostStatus;
