//! Scrolling through the viewer facade: wheel modes, programmatic scrolls,
//! region-change notifications and screen-space cell bounds.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{frozen_grid, grid};
use gridview::scroll::ScrollMode;
use gridview::types::VisibleRegion;

#[test]
fn test_set_scroll_clamps_to_content() {
    let mut view = grid(100, 10);
    // Content is 1560 wide and 3240 tall.
    view.set_scroll(1e9, 1e9, 0.0);
    assert_eq!(view.scroll_left(), 1560.0 - 800.0);
    assert_eq!(view.scroll_top(), 3240.0 - 600.0);
    view.set_scroll(-50.0, -50.0, 10.0);
    assert_eq!(view.scroll_left(), 0.0);
    assert_eq!(view.scroll_top(), 0.0);
}

#[test]
fn test_wheel_line_mode_snaps_to_rows() {
    let mut view = grid(100, 10);
    view.wheel(0.0, 3.0, ScrollMode::Line, 0.0);
    assert_eq!(view.scroll_top(), 3.0 * 32.0);
}

#[test]
fn test_wheel_page_mode_snaps_to_viewport() {
    let mut view = grid(100, 10);
    view.wheel(0.0, 1.0, ScrollMode::Page, 0.0);
    assert_eq!(view.scroll_top(), 600.0);
    view.wheel(0.0, -1.0, ScrollMode::Page, 10.0);
    assert_eq!(view.scroll_top(), 0.0);
}

#[test]
fn test_scroll_to_item_top_aligns_below_header() {
    let mut view = grid(1000, 10);
    view.set_scroll(0.0, 2000.0, 0.0);
    view.scroll_to_item([0, 10]);
    // Row 10 starts at content y 360; it lands just below the 40px header.
    assert_eq!(view.scroll_top(), 320.0);
}

#[test]
fn test_scroll_to_item_bottom_aligns_downward() {
    let mut view = grid(1000, 10);
    view.scroll_to_item([0, 50]);
    // Row 50 ends at content y 1672; bottom-aligned in the 600px viewport.
    assert_eq!(view.scroll_top(), 1072.0);
    // Already visible: nothing moves.
    view.scroll_to_item([0, 45]);
    assert_eq!(view.scroll_top(), 1072.0);
}

#[test]
fn test_scroll_to_frozen_column_is_inert_horizontally() {
    let mut view = frozen_grid(100, 10, 2);
    view.set_scroll(500.0, 0.0, 0.0);
    view.scroll_to_item([1, 0]);
    assert_eq!(view.scroll_left(), 500.0);
    // A scrolled-out column past the freeze line does pull the view.
    view.scroll_to_item([2, 0]);
    // Column 2 starts at content x 360, placed at the freeze boundary
    // (gutter + two frozen columns = 360): scroll_left 0.
    assert_eq!(view.scroll_left(), 0.0);
}

#[test]
fn test_cell_bounds_respect_scroll_and_freeze() {
    let mut view = frozen_grid(100, 10, 2);
    view.set_scroll(300.0, 50.0, 0.0);
    // Frozen column 1 never moves horizontally.
    let frozen = view.cell_bounds([1, 5]);
    assert_eq!(frozen.x, 210.0);
    assert_eq!(frozen.y, 200.0 - 50.0);
    // Column 4 shifts by the horizontal offset.
    let scrolled = view.cell_bounds([4, 5]);
    assert_eq!(scrolled.x, 660.0 - 300.0);
    assert_eq!(scrolled.width, 150.0);
}

#[test]
fn test_region_callback_fires_only_on_window_moves() {
    let mut view = grid(1000, 10);
    let regions: Rc<RefCell<Vec<VisibleRegion>>> = Rc::default();
    let sink = Rc::clone(&regions);
    view.callbacks.on_visible_region_changed = Some(Box::new(move |region| {
        sink.borrow_mut().push(*region);
    }));

    // A 1px nudge scrolls but the materialized window is unchanged.
    view.set_scroll(0.0, 1.0, 0.0);
    assert_eq!(view.scroll_top(), 1.0);
    assert!(regions.borrow().is_empty());

    view.set_scroll(300.0, 1000.0, 10.0);
    let emitted = regions.borrow();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].start_row_index, 30);
    assert_eq!(emitted[0].stop_row_index, 49);
    assert_eq!(emitted[0].start_column_index, 1);
    assert_eq!(emitted[0].stop_column_index, 7);
}

#[test]
fn test_container_resize_reclamps_offsets() {
    let mut view = grid(100, 10);
    view.set_scroll(1e9, 1e9, 0.0);
    view.resize_container(1600.0, 4000.0);
    // The viewport now covers all content on both axes.
    assert_eq!(view.scroll_left(), 0.0);
    assert_eq!(view.scroll_top(), 0.0);
}

#[test]
fn test_settle_repaint_fires_once() {
    let mut view = grid(100, 10);
    view.set_scroll(0.0, 500.0, 0.0);
    view.render(&mut gridview::render::RecordingSurface::new());
    assert!(!view.needs_render());
    // Still inside the 100ms quiet window.
    view.on_frame(50.0);
    assert!(!view.needs_render());
    view.on_frame(150.0);
    assert!(view.needs_render());
    view.render(&mut gridview::render::RecordingSurface::new());
    view.on_frame(400.0);
    assert!(!view.needs_render());
}
