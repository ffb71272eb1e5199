//! Hit testing under scroll and frozen columns.
//!
//! The unit tests in `src/regions.rs` cover the cascade at rest; these cover
//! the coordinate translation cases: scrolled content, frozen panes that
//! ignore horizontal scroll, and multi-control gutters.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{columns, coordinate};
use gridview::layout::{CoordinateManager, CoordinateOptions};
use gridview::regions::{classify, mouse_state, pointer_position, RegionData, RegionQuery};
use gridview::types::{
    ColumnDescriptor, ColumnResizeState, DragState, GridTheme, InteractionConfig, RegionType,
    RowControlType, HEADER_INDEX,
};
use gridview::CombinedSelection;

struct Scene {
    coord: CoordinateManager,
    scroll_left: f32,
    scroll_top: f32,
    selection: CombinedSelection,
    drag: DragState,
    resize: ColumnResizeState,
    columns: Vec<ColumnDescriptor>,
    row_controls: Vec<RowControlType>,
    theme: GridTheme,
    config: InteractionConfig,
}

impl Scene {
    fn new(coord: CoordinateManager) -> Self {
        let count = coord.column_count();
        Self {
            coord,
            scroll_left: 0.0,
            scroll_top: 0.0,
            selection: CombinedSelection::none(),
            drag: DragState::default(),
            resize: ColumnResizeState::default(),
            columns: columns(count),
            row_controls: vec![RowControlType::Checkbox],
            theme: GridTheme::default(),
            config: InteractionConfig::default(),
        }
    }

    fn classify_at(&self, x: f32, y: f32) -> RegionData {
        let pos = pointer_position(
            &self.coord,
            self.scroll_left,
            self.scroll_top,
            x,
            y,
            true,
            true,
        );
        classify(&self.query(x, y, pos.row_index, pos.column_index, pos.is_out_of_bounds))
    }

    fn query(
        &self,
        x: f32,
        y: f32,
        row_index: i64,
        column_index: i64,
        is_out_of_bounds: bool,
    ) -> RegionQuery<'_> {
        RegionQuery {
            x,
            y,
            row_index,
            column_index,
            is_out_of_bounds,
            coord: &self.coord,
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
            selection: &self.selection,
            is_selecting: false,
            drag: &self.drag,
            resize: &self.resize,
            columns: &self.columns,
            row_controls: &self.row_controls,
            theme: &self.theme,
            config: &self.config,
            has_append_row: true,
            has_append_column: true,
        }
    }
}

fn frozen_coord(freeze: usize) -> CoordinateManager {
    CoordinateManager::new(CoordinateOptions {
        row_count: 100,
        column_count: 10,
        row_initial_size: 40.0,
        column_initial_size: 60.0,
        freeze_column_count: freeze,
        ..CoordinateOptions::default()
    })
}

#[test]
fn test_scrolled_cell_resolves_to_shifted_indices() {
    let mut scene = Scene::new(coordinate(1000, 10));
    scene.scroll_left = 300.0;
    scene.scroll_top = 1000.0;
    // Screen (250, 110) → content (550, 1110): column 3, row 33.
    let pos = pointer_position(&scene.coord, 300.0, 1000.0, 250.0, 110.0, true, true);
    assert_eq!(pos.column_index, 3);
    assert_eq!(pos.row_index, 33);
    assert!(!pos.is_out_of_bounds);
    assert_eq!(scene.classify_at(250.0, 110.0).kind, RegionType::Cell);
}

#[test]
fn test_frozen_column_ignores_horizontal_scroll() {
    let mut scene = Scene::new(frozen_coord(2));
    scene.scroll_left = 300.0;
    // x 100 sits inside frozen column 0 (screen == content 60..210)
    // regardless of the horizontal offset.
    let pos = pointer_position(&scene.coord, 300.0, 0.0, 100.0, 100.0, true, true);
    assert_eq!(pos.column_index, 0);
    // Just right of the freeze line the scroll applies again:
    // screen 370 → content 670 → column 4.
    let pos = pointer_position(&scene.coord, 300.0, 0.0, 370.0, 100.0, true, true);
    assert_eq!(pos.column_index, 4);
}

#[test]
fn test_append_column_reachable_after_scrolling() {
    let mut scene = Scene::new(coordinate(100, 10));
    // Columns end at content x 1560; with scroll_left 800 the button starts
    // at screen x 760.
    scene.scroll_left = 800.0;
    let data = scene.classify_at(770.0, 10.0);
    assert_eq!(data.kind, RegionType::AppendColumn);
    let bounds = data.bounds.unwrap();
    assert_eq!(bounds.x, 760.0);
    assert_eq!(bounds.height, 40.0);
}

#[test]
fn test_header_menu_hit_box() {
    let mut scene = Scene::new(coordinate(100, 10));
    for column in &mut scene.columns {
        column.has_menu = true;
    }
    // Column 0 header spans x 60..210; the 16px menu icon sits 8px in from
    // the right edge, vertically centered in the 40px strip.
    let data = scene.classify_at(195.0, 20.0);
    assert_eq!(data.kind, RegionType::ColumnHeaderMenu);
    assert_eq!(data.target, Some(0));
    // Without the menu flag the same point is a plain header.
    for column in &mut scene.columns {
        column.has_menu = false;
    }
    let data = scene.classify_at(195.0, 20.0);
    assert_eq!(data.kind, RegionType::ColumnHeader);
}

#[test]
fn test_multi_control_gutter_slots() {
    let mut scene = Scene::new(coordinate(100, 10));
    scene.row_controls = vec![
        RowControlType::Checkbox,
        RowControlType::Drag,
        RowControlType::Expand,
    ];
    // Three 20px slots across the 60px gutter, 14px boxes centered in each;
    // row 0 spans y 40..72 so the boxes span y 49..63.
    let checkbox = scene.classify_at(10.0, 56.0);
    assert_eq!(checkbox.kind, RegionType::RowHeaderCheckbox);
    let drag = scene.classify_at(30.0, 56.0);
    assert_eq!(drag.kind, RegionType::RowHeaderDragHandler);
    assert_eq!(drag.target, Some(0));
    let expand = scene.classify_at(50.0, 56.0);
    assert_eq!(expand.kind, RegionType::RowHeaderExpandHandler);
    // Between slots: plain row header.
    let gap = scene.classify_at(20.0, 56.0);
    assert_eq!(gap.kind, RegionType::RowHeader);
}

#[test]
fn test_fill_handle_tracks_scrolled_selection() {
    let mut scene = Scene::new(coordinate(1000, 10));
    scene.selection = CombinedSelection::cells([1, 1], [2, 2]);
    scene.scroll_left = 100.0;
    scene.scroll_top = 50.0;
    // Selection corner: content (510, 136) → screen (410, 86).
    let data = scene.classify_at(410.0, 86.0);
    assert_eq!(data.kind, RegionType::FillHandler);
    // A point past the handle radius is an ordinary cell.
    let data = scene.classify_at(430.0, 86.0);
    assert_eq!(data.kind, RegionType::Cell);
}

#[test]
fn test_resize_margin_under_scroll() {
    let mut scene = Scene::new(coordinate(100, 10));
    scene.scroll_left = 150.0;
    // Column 1's right edge: content 360 → screen 210.
    let data = scene.classify_at(212.0, 10.0);
    assert_eq!(data.kind, RegionType::ColumnResizeHandler);
    assert_eq!(data.target, Some(1));
}

#[test]
fn test_mouse_state_fold_records_indices() {
    let scene = Scene::new(coordinate(100, 10));
    let pos = pointer_position(&scene.coord, 0.0, 0.0, 250.0, 110.0, true, true);
    let state = mouse_state(&scene.query(
        250.0,
        110.0,
        pos.row_index,
        pos.column_index,
        pos.is_out_of_bounds,
    ));
    assert_eq!(state.region, RegionType::Cell);
    assert_eq!(state.column_index, 1);
    assert_eq!(state.row_index, 2);
    assert!(!state.is_out_of_bounds);
}

#[test]
fn test_below_append_strip_is_out_of_bounds() {
    let scene = Scene::new(coordinate(100, 10));
    // Rows end at 3240, the append strip at 3272; past that nothing.
    let pos = pointer_position(&scene.coord, 0.0, 0.0, 200.0, 3300.0, true, true);
    assert!(pos.is_out_of_bounds);
    assert_eq!(pos.row_index, HEADER_INDEX);
    assert_eq!(scene.classify_at(200.0, 3300.0).kind, RegionType::Blank);
}
