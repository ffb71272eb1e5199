//! Grid geometry: coordinate management and virtualization queries.

pub mod coordinate;

pub use coordinate::{CoordinateManager, CoordinateOptions, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};
