//! Full gesture scenarios through the pointer event surface, driven by a
//! manual clock: press/move/release sequences in, host callbacks out.
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

use common::{columns, grid};
use gridview::interaction::ClickModifiers;
use gridview::types::RowControlType;
use gridview::viewer::{GridOptions, GridView};
use gridview::{CombinedSelection, SelectionKind};

const SHIFT: ClickModifiers = ClickModifiers {
    shift: true,
    meta: false,
};
const META: ClickModifiers = ClickModifiers {
    shift: false,
    meta: true,
};

fn counter<T: 'static>(slot: &Rc<RefCell<Vec<T>>>) -> Rc<RefCell<Vec<T>>> {
    Rc::clone(slot)
}

#[test]
fn test_shift_click_extends_through_event_layer() {
    let mut view = grid(100, 10);
    let mods = ClickModifiers::default();
    // Column 1 spans x 210..360, row 2 spans y 104..136.
    view.pointer_down(250.0, 110.0, mods, 0.0);
    view.pointer_up(250.0, 110.0, 10.0);
    // Column 3 spans x 510..660, row 5 spans y 200..232.
    view.pointer_down(560.0, 207.0, SHIFT, 400.0);
    view.pointer_up(560.0, 207.0, 410.0);

    assert_eq!(view.selection().anchor(), Some([1, 2]));
    assert_eq!(view.selection().focus(), Some([3, 5]));
}

#[test]
fn test_header_meta_click_accumulates_columns() {
    let mut view = grid(100, 10);
    view.pointer_down(100.0, 10.0, ClickModifiers::default(), 0.0);
    view.pointer_up(100.0, 10.0, 10.0);
    // Column 2 spans x 360..510.
    view.pointer_down(400.0, 10.0, META, 500.0);
    view.pointer_up(400.0, 10.0, 510.0);

    assert_eq!(view.selection().kind, SelectionKind::Columns);
    assert_eq!(view.selection().ranges, vec![[0, 0], [2, 2]]);

    // Meta-click on a member toggles it back off.
    view.pointer_down(400.0, 10.0, META, 1000.0);
    view.pointer_up(400.0, 10.0, 1010.0);
    assert_eq!(view.selection().ranges, vec![[0, 0]]);
}

#[test]
fn test_autoscroll_drags_selection_with_the_view() {
    let mut view = grid(1000, 10);
    let mods = ClickModifiers::default();
    view.pointer_down(250.0, 110.0, mods, 0.0);
    // Park the pointer in the bottom-right edge bands.
    view.pointer_move(790.0, 590.0, 0.0);
    assert_eq!(view.selection().anchor(), Some([1, 2]));
    assert_eq!(view.selection().focus(), Some([4, 17]));

    // Half ramp dwell: 1.5 px/ms * 0.5 * 600ms on both axes; horizontal
    // clamps to the 760px of scrollable width.
    view.on_frame(600.0);
    assert_eq!(view.scroll_top(), 450.0);
    assert_eq!(view.scroll_left(), 450.0);
    // The focus corner followed the parked pointer into the new window.
    assert_eq!(view.selection().focus(), Some([7, 31]));

    view.pointer_up(790.0, 590.0, 700.0);
    // Release stops the autoscroll; further frames only settle.
    view.on_frame(1300.0);
    assert_eq!(view.scroll_top(), 450.0);
}

#[test]
fn test_header_single_click_reports_after_window() {
    let mut view = grid(100, 10);
    let clicked: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = counter(&clicked);
    view.callbacks.on_column_header_clicked = Some(Box::new(move |col| {
        sink.borrow_mut().push(col);
    }));

    view.pointer_down(100.0, 10.0, ClickModifiers::default(), 0.0);
    view.pointer_up(100.0, 10.0, 10.0);
    // Inside the double-click window the click stays buffered.
    view.on_frame(200.0);
    assert!(clicked.borrow().is_empty());
    view.on_frame(400.0);
    assert_eq!(clicked.borrow().as_slice(), &[0]);
}

#[test]
fn test_blur_abandons_reorder_drag() {
    let mut view = grid(100, 10);
    let moved: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
    let sink = counter(&moved);
    view.callbacks.on_column_reordered = Some(Box::new(move |from, to| {
        sink.borrow_mut().push((from, to));
    }));

    view.pointer_down(100.0, 10.0, ClickModifiers::default(), 0.0);
    view.pointer_move(580.0, 10.0, 16.0);
    view.cancel_interactions();
    view.pointer_up(580.0, 10.0, 32.0);
    assert!(moved.borrow().is_empty());
}

#[test]
fn test_gutter_drag_handle_reorders_row() {
    let mut view = GridView::new(GridOptions {
        row_count: 100,
        columns: columns(10),
        row_controls: vec![RowControlType::Checkbox, RowControlType::Drag],
        ..GridOptions::default()
    });
    let moved: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
    let sink = counter(&moved);
    view.callbacks.on_row_reordered = Some(Box::new(move |from, to| {
        sink.borrow_mut().push((from, to));
    }));

    // Two 30px gutter slots; the drag handle box spans x 38..52, and row 0's
    // control boxes span y 49..63.
    view.pointer_down(45.0, 56.0, ClickModifiers::default(), 0.0);
    view.pointer_move(45.0, 300.0, 16.0);
    view.pointer_up(45.0, 300.0, 32.0);
    // Row 8 spans content y 296..328; 300 is its near half.
    assert_eq!(moved.borrow().as_slice(), &[(0, 8)]);
}

#[test]
fn test_expand_handle_notifies_row() {
    let mut view = GridView::new(GridOptions {
        row_count: 100,
        columns: columns(10),
        row_controls: vec![RowControlType::Checkbox, RowControlType::Expand],
        ..GridOptions::default()
    });
    let expanded: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = counter(&expanded);
    view.callbacks.on_row_expanded = Some(Box::new(move |row| {
        sink.borrow_mut().push(row);
    }));

    view.pointer_down(45.0, 56.0, ClickModifiers::default(), 0.0);
    view.pointer_up(45.0, 56.0, 10.0);
    assert_eq!(expanded.borrow().as_slice(), &[0]);
}

#[test]
fn test_header_menu_click_notifies_column() {
    let mut view = GridView::new(GridOptions {
        row_count: 100,
        columns: columns(10)
            .into_iter()
            .map(|mut c| {
                c.has_menu = true;
                c
            })
            .collect(),
        ..GridOptions::default()
    });
    let menus: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = counter(&menus);
    view.callbacks.on_column_menu_clicked = Some(Box::new(move |col| {
        sink.borrow_mut().push(col);
    }));

    // Column 0's menu icon box spans x 186..202, y 12..28.
    view.pointer_down(195.0, 20.0, ClickModifiers::default(), 0.0);
    view.pointer_up(195.0, 20.0, 10.0);
    assert_eq!(menus.borrow().as_slice(), &[0]);
    // A plain header press does not.
    view.pointer_down(100.0, 20.0, ClickModifiers::default(), 500.0);
    view.pointer_up(100.0, 20.0, 510.0);
    assert_eq!(menus.borrow().as_slice(), &[0]);
}

#[test]
fn test_clipboard_ops_emit_normalized_selection() {
    let mut view = grid(100, 10);
    view.set_selection(CombinedSelection::cells([4, 7], [2, 3])).unwrap();
    let copied: Rc<RefCell<Vec<CombinedSelection>>> = Rc::default();
    let sink = counter(&copied);
    view.callbacks.on_copy = Some(Box::new(move |sel| {
        sink.borrow_mut().push(sel.clone());
    }));
    let deleted: Rc<RefCell<Vec<CombinedSelection>>> = Rc::default();
    let sink = counter(&deleted);
    view.callbacks.on_delete = Some(Box::new(move |sel| {
        sink.borrow_mut().push(sel.clone());
    }));

    view.copy();
    view.delete();
    assert_eq!(copied.borrow()[0], CombinedSelection::cells([2, 3], [4, 7]));
    assert_eq!(deleted.borrow()[0], CombinedSelection::cells([2, 3], [4, 7]));
}

#[test]
fn test_context_menu_reports_position_and_region() {
    let mut view = grid(100, 10);
    let menus: Rc<RefCell<Vec<(f32, f32)>>> = Rc::default();
    let sink = counter(&menus);
    view.callbacks.on_context_menu = Some(Box::new(move |x, y| {
        sink.borrow_mut().push((x, y));
    }));

    view.context_menu(250.0, 110.0);
    assert_eq!(menus.borrow().as_slice(), &[(250.0, 110.0)]);
    assert_eq!(view.mouse().column_index, 1);
    assert_eq!(view.mouse().row_index, 2);
}

#[test]
fn test_cursor_follows_hovered_region() {
    let mut view = grid(100, 10);
    view.pointer_move(250.0, 110.0, 0.0);
    assert_eq!(view.cursor(), "cell");
    // Column 0's right edge at x 210.
    view.pointer_move(210.0, 10.0, 16.0);
    assert_eq!(view.cursor(), "col-resize");
    view.pointer_move(100.0, 10.0, 32.0);
    assert_eq!(view.cursor(), "default");
}
