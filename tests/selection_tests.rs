//! Selection semantics at the engine boundary: host-driven updates,
//! normalization on the way out, and the additive merge rules.
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

use common::grid;
use gridview::{CombinedSelection, SelectionKind};

#[test]
fn test_set_selection_rejects_out_of_bounds_rows() {
    let mut view = grid(100, 10);
    let result = view.set_selection(CombinedSelection::rows(vec![[0, 100]]).unwrap());
    assert!(result.is_err());
    assert!(view.selection().is_none());
}

#[test]
fn test_set_selection_rejects_out_of_bounds_cells() {
    let mut view = grid(100, 10);
    let result = view.set_selection(CombinedSelection::cells([2, 2], [10, 5]));
    assert!(result.is_err());

    // The boundary cell itself is fine.
    let result = view.set_selection(CombinedSelection::cells([0, 0], [9, 99]));
    assert!(result.is_ok());
}

#[test]
fn test_host_callback_receives_normalized_cells() {
    let mut view = grid(100, 10);
    let emitted: Rc<RefCell<Vec<CombinedSelection>>> = Rc::default();
    let sink = Rc::clone(&emitted);
    view.callbacks.on_selection_changed = Some(Box::new(move |sel| {
        sink.borrow_mut().push(sel.clone());
    }));

    // Anchor below-right of focus: the wire form is min/max ordered.
    view.set_selection(CombinedSelection::cells([4, 7], [2, 3])).unwrap();
    let out = emitted.borrow();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0], CombinedSelection::cells([2, 3], [4, 7]));
}

#[test]
fn test_internal_value_keeps_gesture_corners() {
    let mut view = grid(100, 10);
    view.set_selection(CombinedSelection::cells([4, 7], [2, 3])).unwrap();
    // The engine keeps anchor/focus as given; only the wire form normalizes.
    assert_eq!(view.selection().anchor(), Some([4, 7]));
    assert_eq!(view.selection().focus(), Some([2, 3]));
    assert_eq!(view.selection().cell_bounds(), Some([2, 3, 4, 7]));
}

#[test]
fn test_expand_across_kinds_starts_over() {
    let rows = CombinedSelection::rows(vec![[2, 4]]).unwrap();
    let cells = rows.expand([3, 3], SelectionKind::Cells);
    assert_eq!(cells.kind, SelectionKind::Cells);
    assert_eq!(cells.anchor(), Some([3, 3]));
    assert_eq!(cells.focus(), Some([3, 3]));

    let cols = cells.expand([1, 1], SelectionKind::Columns);
    assert_eq!(cols.kind, SelectionKind::Columns);
    assert_eq!(cols.ranges, vec![[1, 1]]);
}

#[test]
fn test_merge_across_kinds_falls_back_to_expand() {
    let rows = CombinedSelection::rows(vec![[2, 2]]).unwrap();
    let cols = rows.merge([5, 5], SelectionKind::Columns);
    assert_eq!(cols.kind, SelectionKind::Columns);
    assert_eq!(cols.ranges, vec![[5, 5]]);
}

#[test]
fn test_merge_bridges_gap_between_ranges() {
    let rows = CombinedSelection::rows(vec![[1, 2], [5, 6]]).unwrap();
    // [3,4] touches both neighbors: everything coalesces.
    let rows = rows.merge([3, 4], SelectionKind::Rows);
    assert_eq!(rows.ranges, vec![[1, 6]]);
}

#[test]
fn test_merge_toggle_only_removes_exact_members() {
    let rows = CombinedSelection::rows(vec![[1, 5]]).unwrap();
    // [2,2] is contained but not an exact member: it is added and re-merged,
    // leaving the selection unchanged.
    let same = rows.merge([2, 2], SelectionKind::Rows);
    assert_eq!(same.ranges, vec![[1, 5]]);
    // The exact member toggles off.
    let none = same.merge([1, 5], SelectionKind::Rows);
    assert!(none.is_none());
}

#[test]
fn test_row_selection_includes_every_column() {
    let mut view = grid(100, 10);
    view.set_selection(CombinedSelection::rows(vec![[10, 20]]).unwrap())
        .unwrap();
    assert!(view.selection().includes_cell(0, 15));
    assert!(view.selection().includes_cell(9, 10));
    assert!(!view.selection().includes_cell(3, 21));
}

#[test]
fn test_set_selection_none_clears() {
    let mut view = grid(100, 10);
    view.set_selection(CombinedSelection::cells([1, 1], [2, 2])).unwrap();
    view.set_selection(CombinedSelection::none()).unwrap();
    assert!(view.selection().is_none());
    assert_eq!(view.selection().cell_bounds(), None);
}
