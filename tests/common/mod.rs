//! Shared fixtures for the integration suite.
//!
//! The standard grid geometry used throughout: 40px header strip, 60px
//! row-header gutter, 150px columns, 32px rows, 800x600 container. Under it,
//! column `c` spans content x `60 + 150c` and row `r` spans content y
//! `40 + 32r`.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::layout::{CoordinateManager, CoordinateOptions};
use gridview::viewer::{GridOptions, GridView};
use gridview::ColumnDescriptor;

pub const HEADER_HEIGHT: f32 = 40.0;
pub const GUTTER_WIDTH: f32 = 60.0;
pub const COLUMN_WIDTH: f32 = 150.0;
pub const ROW_HEIGHT: f32 = 32.0;

/// `n` uniform 150px columns named `Col 0..n`.
#[must_use]
pub fn columns(n: usize) -> Vec<ColumnDescriptor> {
    (0..n)
        .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Col {i}"), COLUMN_WIDTH))
        .collect()
}

/// Bare geometry with the standard header strip and gutter.
#[must_use]
pub fn coordinate(rows: usize, cols: usize) -> CoordinateManager {
    CoordinateManager::new(CoordinateOptions {
        row_count: rows,
        column_count: cols,
        row_initial_size: HEADER_HEIGHT,
        column_initial_size: GUTTER_WIDTH,
        ..CoordinateOptions::default()
    })
}

/// A full engine with append affordances enabled.
#[must_use]
pub fn grid(rows: usize, cols: usize) -> GridView {
    GridView::new(GridOptions {
        row_count: rows,
        columns: columns(cols),
        header_height: HEADER_HEIGHT,
        gutter_width: GUTTER_WIDTH,
        has_append_row: true,
        has_append_column: true,
        ..GridOptions::default()
    })
}

/// A full engine with the leading `freeze` columns frozen.
#[must_use]
pub fn frozen_grid(rows: usize, cols: usize, freeze: usize) -> GridView {
    GridView::new(GridOptions {
        row_count: rows,
        columns: columns(cols),
        header_height: HEADER_HEIGHT,
        gutter_width: GUTTER_WIDTH,
        freeze_column_count: freeze,
        ..GridOptions::default()
    })
}
