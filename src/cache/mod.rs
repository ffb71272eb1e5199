//! Resource caches for the render pipeline.
//!
//! `ImageCache` tracks decoded cell images against the visible window and
//! recycles backing resources through a bounded `ResourcePool`. `SpriteCache`
//! memoizes small rasterized glyphs (icons, checkboxes) keyed by id, size and
//! color.

pub mod image;
pub mod pool;
pub mod sprite;

pub use image::{pack_cell, unpack_cell, ImageCache, ImageLoader, CELL_PACK_BASE};
pub use pool::ResourcePool;
pub use sprite::{SpriteCache, SpriteKey};
