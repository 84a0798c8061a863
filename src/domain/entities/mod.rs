//! Domain entity definitions.

mod image_variant;
mod post;
mod sort_order;

pub use image_variant::ImageVariant;
pub use post::{Post, PostId, PreviewSize};
pub use sort_order::SortOrder;
