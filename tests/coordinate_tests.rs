//! Geometry and virtualization queries against realistic grid shapes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{coordinate, COLUMN_WIDTH, GUTTER_WIDTH, HEADER_HEIGHT, ROW_HEIGHT};
use gridview::layout::{CoordinateManager, CoordinateOptions};
use test_case::test_case;

#[test_case(0; "first row")]
#[test_case(1; "second row")]
#[test_case(17; "mid viewport")]
#[test_case(99_999; "deep row")]
fn test_offset_index_round_trip(row: usize) {
    let coord = coordinate(100_000, 10);
    let y = coord.row_offset(row);
    assert_eq!(y, HEADER_HEIGHT + ROW_HEIGHT * row as f32);
    assert_eq!(coord.row_index_at(y + 1.0), row);
}

#[test]
fn test_direct_jump_into_unmeasured_territory() {
    // First query lands deep in the grid; nothing before it was measured.
    let coord = coordinate(1_000_000, 10);
    assert_eq!(
        coord.row_offset(900_000),
        HEADER_HEIGHT + ROW_HEIGHT * 900_000.0
    );
    assert_eq!(
        coord.row_index_at(HEADER_HEIGHT + ROW_HEIGHT * 123_456.0 + 5.0),
        123_456
    );
}

#[test]
fn test_cell_rect_composes_offsets_and_sizes() {
    let coord = coordinate(100, 10);
    let rect = coord.cell_rect(3, 2);
    assert_eq!(rect.x, GUTTER_WIDTH + COLUMN_WIDTH * 3.0);
    assert_eq!(rect.y, HEADER_HEIGHT + ROW_HEIGHT * 2.0);
    assert_eq!(rect.width, COLUMN_WIDTH);
    assert_eq!(rect.height, ROW_HEIGHT);
}

#[test]
fn test_column_resize_ripples_following_offsets() {
    let mut coord = coordinate(10, 10);
    let before = coord.column_offset(5);
    coord.set_column_width(2, 200.0);
    assert_eq!(coord.column_offset(5), before + 50.0);
    // Columns before the override are untouched.
    assert_eq!(coord.column_offset(1), GUTTER_WIDTH + COLUMN_WIDTH);
    assert_eq!(coord.column_width_at(2), 200.0);
}

#[test]
fn test_visible_region_at_scroll_offsets() {
    let coord = coordinate(1000, 10);
    let region = coord.visible_region(300.0, 1000.0);
    // Rows: content y 1040 falls in row 31; one overscan row above. The walk
    // stops at the first row whose bottom clears y 1600, plus one overscan.
    assert_eq!(region.start_row_index, 30);
    assert_eq!(region.stop_row_index, 49);
    // Columns: content x 360 is column 2's left edge; overscan brings 1.
    assert_eq!(region.start_column_index, 1);
    assert_eq!(region.stop_column_index, 7);
}

#[test]
fn test_visible_region_clamps_at_edges() {
    let coord = coordinate(1000, 10);
    let top = coord.visible_region(0.0, 0.0);
    assert_eq!(top.start_row_index, 0);
    assert_eq!(top.start_column_index, 0);

    let bottom = coord.visible_region(1e9, 1e9);
    assert_eq!(bottom.stop_row_index, 999);
    assert_eq!(bottom.stop_column_index, 9);
    assert!(bottom.start_row_index <= bottom.stop_row_index);
}

#[test]
fn test_shrinking_row_count_invalidates_tail() {
    let mut coord = coordinate(1000, 5);
    assert_eq!(coord.row_offset(999), HEADER_HEIGHT + ROW_HEIGHT * 999.0);
    coord.set_row_count(100);
    assert_eq!(coord.row_index_at(1e9), 99);
    assert_eq!(coord.total_height(), HEADER_HEIGHT + ROW_HEIGHT * 100.0);
}

#[test]
fn test_freeze_count_clamps_to_column_count() {
    let coord = CoordinateManager::new(CoordinateOptions {
        row_count: 10,
        column_count: 3,
        freeze_column_count: 8,
        ..CoordinateOptions::default()
    });
    assert_eq!(coord.freeze_column_count(), 3);

    let mut coord = CoordinateManager::new(CoordinateOptions {
        row_count: 10,
        column_count: 10,
        freeze_column_count: 4,
        ..CoordinateOptions::default()
    });
    coord.set_column_count(2);
    assert_eq!(coord.freeze_column_count(), 2);
}

#[test]
fn test_container_resize_widens_visible_window() {
    let mut coord = coordinate(1000, 10);
    let small = coord.visible_region(0.0, 0.0);
    coord.set_container_size(800.0, 1200.0);
    let tall = coord.visible_region(0.0, 0.0);
    assert!(tall.stop_row_index > small.stop_row_index);
    assert_eq!(tall.start_row_index, 0);
}

#[test]
fn test_mixed_row_heights_keep_search_consistent() {
    let mut coord = coordinate(500, 5);
    coord.set_row_height(10, 100.0);
    coord.set_row_height(11, 4.0);
    for row in [9, 10, 11, 12, 200] {
        let mid = coord.row_offset(row) + coord.row_height_at(row) / 2.0;
        assert_eq!(coord.row_index_at(mid), row, "row {row}");
    }
}
