//! Layered canvas render pipeline.

pub mod cells;
pub mod headers;
pub mod indicators;
pub mod pipeline;
pub mod surface;

pub use pipeline::{frame_region, render, CellSource, RenderFrame};
pub use surface::{DrawOp, DrawSurface, RecordingSurface, TextAlign};
