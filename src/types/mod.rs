//! Core value types shared across the engine.

pub mod cell;
pub mod state;
pub mod theme;

pub use cell::{CellDescriptor, ColumnDescriptor, RowControlType, SelectChoice};
pub use state::{
    ColumnResizeState, DragState, DragType, InteractionConfig, MouseState, RegionType,
    APPEND_INDEX, HEADER_INDEX,
};
pub use theme::GridTheme;

use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` index interval (rows or columns).
pub type IndexRange = [usize; 2];

/// A cell coordinate as `[column, row]`, matching the host-facing convention.
pub type CellCoord = [usize; 2];

/// Axis-aligned rectangle in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Construct a rectangle from its origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside (edges inclusive).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Right edge x coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The currently materialized slice of the logical grid.
///
/// Derived from scroll offsets on every change, never persisted. Indices are
/// inclusive and always clamped to `[0, count - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRegion {
    pub start_row_index: usize,
    pub stop_row_index: usize,
    pub start_column_index: usize,
    pub stop_column_index: usize,
}

impl VisibleRegion {
    /// Whether the row index falls inside the vertical window.
    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.start_row_index && row <= self.stop_row_index
    }

    /// Whether the column index falls inside the horizontal window.
    pub fn contains_column(&self, col: usize) -> bool {
        col >= self.start_column_index && col <= self.stop_column_index
    }

    /// Whether the cell falls inside the window.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.contains_row(row) && self.contains_column(col)
    }
}
