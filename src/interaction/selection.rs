//! Cell/row/column selection state machine.
//!
//! `Idle → Selecting → Idle`. Pointer-down over a cell anchors a rectangle,
//! moves extend the focus corner, and pointer-up over the same single cell a
//! second time activates it (the host enters edit mode). Header clicks build
//! row/column selections with shift-range and meta-toggle semantics.

use crate::selection::{CombinedSelection, SelectionKind};
use crate::types::RegionType;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    pub shift: bool,
    /// ⌘ on macOS, Ctrl elsewhere.
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Selecting,
}

/// Drives the [`CombinedSelection`] value from classified pointer events.
#[derive(Debug, Default)]
pub struct SelectionController {
    phase: Phase,
    /// Cell the current gesture anchored at.
    gesture_anchor: Option<[usize; 2]>,
    /// Single cell the previous completed gesture resolved to.
    last_single_cell: Option<[usize; 2]>,
    /// Header index the previous row/column click anchored at (for shift).
    last_header_anchor: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a cell-selection drag is in progress.
    pub fn is_selecting(&self) -> bool {
        self.phase == Phase::Selecting
    }

    /// Pointer-down over a classified region. Returns the new selection, or
    /// `None` when this region does not affect selection.
    pub fn on_pointer_down(
        &mut self,
        region: RegionType,
        row: usize,
        col: usize,
        modifiers: ClickModifiers,
        current: &CombinedSelection,
    ) -> Option<CombinedSelection> {
        match region {
            RegionType::Cell => {
                self.phase = Phase::Selecting;
                if modifiers.shift && current.is_cells() {
                    // Extend the existing rectangle instead of re-anchoring.
                    self.gesture_anchor = current.anchor();
                    return Some(current.expand([col, row], SelectionKind::Cells));
                }
                self.gesture_anchor = Some([col, row]);
                Some(CombinedSelection::cells([col, row], [col, row]))
            }
            RegionType::RowHeader | RegionType::RowHeaderCheckbox => {
                Some(self.header_click(SelectionKind::Rows, row, modifiers, current))
            }
            RegionType::ColumnHeader => {
                Some(self.header_click(SelectionKind::Columns, col, modifiers, current))
            }
            _ => None,
        }
    }

    fn header_click(
        &mut self,
        kind: SelectionKind,
        index: usize,
        modifiers: ClickModifiers,
        current: &CombinedSelection,
    ) -> CombinedSelection {
        self.phase = Phase::Idle;
        self.gesture_anchor = None;
        if modifiers.shift && current.kind == kind {
            let anchor = self.last_header_anchor.unwrap_or(index);
            let range = [anchor.min(index), anchor.max(index)];
            return current.expand(range, kind);
        }
        self.last_header_anchor = Some(index);
        if modifiers.meta {
            return current.merge([index, index], kind);
        }
        // Plain click replaces the selection; the constructor cannot fail for
        // a single range, but fall back to the current value if it ever does.
        match kind {
            SelectionKind::Rows => {
                CombinedSelection::rows(vec![[index, index]]).unwrap_or_else(|_| current.clone())
            }
            _ => CombinedSelection::columns(vec![[index, index]])
                .unwrap_or_else(|_| current.clone()),
        }
    }

    /// Pointer-move while selecting: extend the focus corner. Returns the new
    /// selection only when the focus actually moved.
    pub fn on_pointer_move(
        &mut self,
        row: usize,
        col: usize,
        current: &CombinedSelection,
    ) -> Option<CombinedSelection> {
        if self.phase != Phase::Selecting {
            return None;
        }
        if current.focus() == Some([col, row]) {
            return None;
        }
        Some(current.expand([col, row], SelectionKind::Cells))
    }

    /// Pointer-up: ends the gesture. Returns the cell to activate (enter edit
    /// mode) when this gesture and the previous one both resolved to the same
    /// single cell.
    pub fn on_pointer_up(&mut self, current: &CombinedSelection) -> Option<[usize; 2]> {
        if self.phase != Phase::Selecting {
            return None;
        }
        self.phase = Phase::Idle;
        let anchor = self.gesture_anchor.take()?;
        if current.anchor() != Some(anchor) || current.focus() != Some(anchor) {
            self.last_single_cell = None;
            return None;
        }
        let activate = self.last_single_cell == Some(anchor);
        self.last_single_cell = Some(anchor);
        activate.then_some(anchor)
    }

    /// Reset on blur or explicit API call.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.gesture_anchor = None;
        self.last_single_cell = None;
        self.last_header_anchor = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_click_selects_single_cell() {
        let mut ctl = SelectionController::new();
        let sel = ctl
            .on_pointer_down(
                RegionType::Cell,
                3,
                2,
                ClickModifiers::default(),
                &CombinedSelection::none(),
            )
            .unwrap();
        assert_eq!(sel, CombinedSelection::cells([2, 3], [2, 3]));
        assert!(ctl.is_selecting());
        assert_eq!(ctl.on_pointer_up(&sel), None);
    }

    #[test]
    fn test_drag_extends_rectangle() {
        let mut ctl = SelectionController::new();
        let sel = ctl
            .on_pointer_down(
                RegionType::Cell,
                0,
                0,
                ClickModifiers::default(),
                &CombinedSelection::none(),
            )
            .unwrap();
        let sel = ctl.on_pointer_move(4, 2, &sel).unwrap();
        assert_eq!(sel.focus(), Some([2, 4]));
        // No move: no new value.
        assert!(ctl.on_pointer_move(4, 2, &sel).is_none());
        // Rectangle gesture never activates.
        assert_eq!(ctl.on_pointer_up(&sel), None);
    }

    #[test]
    fn test_second_click_on_same_cell_activates() {
        let mut ctl = SelectionController::new();
        let mods = ClickModifiers::default();
        let sel = ctl
            .on_pointer_down(RegionType::Cell, 1, 1, mods, &CombinedSelection::none())
            .unwrap();
        assert_eq!(ctl.on_pointer_up(&sel), None);
        let sel = ctl.on_pointer_down(RegionType::Cell, 1, 1, mods, &sel).unwrap();
        assert_eq!(ctl.on_pointer_up(&sel), Some([1, 1]));
    }

    #[test]
    fn test_click_elsewhere_does_not_activate() {
        let mut ctl = SelectionController::new();
        let mods = ClickModifiers::default();
        let sel = ctl
            .on_pointer_down(RegionType::Cell, 1, 1, mods, &CombinedSelection::none())
            .unwrap();
        ctl.on_pointer_up(&sel);
        let sel = ctl.on_pointer_down(RegionType::Cell, 2, 1, mods, &sel).unwrap();
        assert_eq!(ctl.on_pointer_up(&sel), None);
    }

    #[test]
    fn test_header_meta_toggle() {
        let mut ctl = SelectionController::new();
        let sel = ctl
            .on_pointer_down(
                RegionType::ColumnHeader,
                0,
                2,
                ClickModifiers::default(),
                &CombinedSelection::none(),
            )
            .unwrap();
        assert_eq!(sel.ranges, vec![[2, 2]]);
        let meta = ClickModifiers {
            meta: true,
            ..ClickModifiers::default()
        };
        let sel = ctl.on_pointer_down(RegionType::ColumnHeader, 0, 4, meta, &sel).unwrap();
        assert_eq!(sel.ranges, vec![[2, 2], [4, 4]]);
        let sel = ctl.on_pointer_down(RegionType::ColumnHeader, 0, 4, meta, &sel).unwrap();
        assert_eq!(sel.ranges, vec![[2, 2]]);
    }

    #[test]
    fn test_header_shift_range() {
        let mut ctl = SelectionController::new();
        let sel = ctl
            .on_pointer_down(
                RegionType::RowHeader,
                3,
                0,
                ClickModifiers::default(),
                &CombinedSelection::none(),
            )
            .unwrap();
        let shift = ClickModifiers {
            shift: true,
            ..ClickModifiers::default()
        };
        let sel = ctl.on_pointer_down(RegionType::RowHeader, 7, 0, shift, &sel).unwrap();
        assert_eq!(sel.ranges, vec![[3, 7]]);
    }

    #[test]
    fn test_shift_click_extends_cells() {
        let mut ctl = SelectionController::new();
        let mods = ClickModifiers::default();
        let sel = ctl
            .on_pointer_down(RegionType::Cell, 1, 1, mods, &CombinedSelection::none())
            .unwrap();
        ctl.on_pointer_up(&sel);
        let shift = ClickModifiers {
            shift: true,
            ..ClickModifiers::default()
        };
        let sel = ctl.on_pointer_down(RegionType::Cell, 5, 3, shift, &sel).unwrap();
        assert_eq!(sel.anchor(), Some([1, 1]));
        assert_eq!(sel.focus(), Some([3, 5]));
    }
}
