//! Row/column drag-reorder state machine.
//!
//! Armed on pointer-down over a draggable header or row handle; becomes a
//! real drag only after the pointer travels past the arming threshold, so a
//! plain click never reorders anything. The drop target is the hovered item,
//! split at its midpoint: the near half inserts before it, the far half
//! after. Dropping back onto the source interval `[source, source + 1)` is a
//! no-op.

use crate::layout::CoordinateManager;
use crate::types::{DragState, DragType};

/// Drives [`DragState`] from pointer events.
#[derive(Debug, Default)]
pub struct DragReorderController {
    state: DragState,
    /// Pointer position at arm time.
    origin: (f32, f32),
    /// Offset of the dragged item's leading edge at arm time.
    item_origin: f32,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Arm a potential drag. `item_origin` is the dragged item's leading
    /// edge along the drag axis, in the same coordinate space as the pointer
    /// (callers pass viewport coordinates); only differences against it are
    /// ever used, so the space just has to match `on_pointer_move`.
    pub fn arm(&mut self, drag_type: DragType, source_index: usize, x: f32, y: f32, item_origin: f32) {
        self.state = DragState {
            drag_type,
            source_index,
            delta: 0.0,
            is_dragging: false,
        };
        self.origin = (x, y);
        self.item_origin = item_origin;
    }

    /// Track pointer travel. Returns true when the drag state changed (armed
    /// → dragging, or a dragging delta update).
    pub fn on_pointer_move(&mut self, x: f32, y: f32, threshold: f32) -> bool {
        if self.state.drag_type == DragType::None {
            return false;
        }
        let along = match self.state.drag_type {
            DragType::Column => x,
            _ => y,
        };
        let origin_along = match self.state.drag_type {
            DragType::Column => self.origin.0,
            _ => self.origin.1,
        };
        if !self.state.is_dragging {
            let dx = x - self.origin.0;
            let dy = y - self.origin.1;
            if (dx * dx + dy * dy).sqrt() < threshold {
                return false;
            }
            self.state.is_dragging = true;
        }
        self.state.delta = along - origin_along + (origin_along - self.item_origin);
        true
    }

    /// Drop-target index for the current pointer position along the drag
    /// axis (in content coordinates). `None` when the drop would be a no-op:
    /// not actually dragging, or landing back on the source.
    pub fn drop_index(&self, coord: &CoordinateManager, content_offset: f32) -> Option<usize> {
        if !self.state.is_dragging {
            return None;
        }
        let (hovered, leading, size) = match self.state.drag_type {
            DragType::Column => {
                let idx = coord.column_index_at(content_offset);
                (idx, coord.column_offset(idx), coord.column_width_at(idx))
            }
            DragType::Row => {
                let idx = coord.row_index_at(content_offset);
                (idx, coord.row_offset(idx), coord.row_height_at(idx))
            }
            DragType::None => return None,
        };
        // Near half inserts before the hovered item, far half after.
        let insert = if content_offset < leading + size / 2.0 {
            hovered
        } else {
            hovered + 1
        };
        let source = self.state.source_index;
        if insert == source || insert == source + 1 {
            return None;
        }
        Some(insert)
    }

    /// End the gesture. Returns `(source, insert)` when a real reorder
    /// happened; clears all drag state either way.
    pub fn finish(&mut self, coord: &CoordinateManager, content_offset: f32) -> Option<(usize, usize)> {
        let result = self
            .drop_index(coord, content_offset)
            .map(|insert| (self.state.source_index, insert));
        self.state = DragState::default();
        result
    }

    /// Abandon without dropping (blur, escape).
    pub fn reset(&mut self) {
        self.state = DragState::default();
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
    use crate::layout::CoordinateOptions;

    fn coord() -> CoordinateManager {
        // 10 columns of 150px, 100 rows of 32px.
        CoordinateManager::new(CoordinateOptions {
            row_count: 100,
            column_count: 10,
            ..CoordinateOptions::default()
        })
    }

    #[test]
    fn test_micro_travel_never_arms() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Column, 2, 310.0, 10.0, 300.0);
        assert!(!ctl.on_pointer_move(313.0, 11.0, 5.0));
        assert!(!ctl.state().is_dragging);
        assert_eq!(ctl.finish(&coord, 313.0), None);
    }

    #[test]
    fn test_threshold_arms_drag() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Column, 2, 310.0, 10.0, 300.0);
        assert!(ctl.on_pointer_move(320.0, 10.0, 5.0));
        assert!(ctl.state().is_dragging);
        // Delta is pointer minus the dragged item's origin.
        assert_eq!(ctl.state().delta, 20.0);
        assert_eq!(ctl.finish(&coord, 700.0), Some((2, 5)));
    }

    #[test]
    fn test_delta_ignores_coordinate_space() {
        // The same gesture as test_threshold_arms_drag expressed in viewport
        // coordinates under a 200px horizontal scroll. Only differences
        // against the arm-time values are used, so the delta is identical.
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Column, 2, 110.0, 10.0, 100.0);
        assert!(ctl.on_pointer_move(120.0, 10.0, 5.0));
        assert_eq!(ctl.state().delta, 20.0);
    }

    #[test]
    fn test_near_half_inserts_before() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Column, 0, 10.0, 10.0, 0.0);
        ctl.on_pointer_move(600.0, 10.0, 5.0);
        // Column 4 spans 600..750; 620 is in its near half.
        assert_eq!(ctl.drop_index(&coord, 620.0), Some(4));
        // 740 is in the far half.
        assert_eq!(ctl.drop_index(&coord, 740.0), Some(5));
    }

    #[test]
    fn test_drop_on_own_origin_is_noop() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Column, 3, 460.0, 10.0, 450.0);
        ctl.on_pointer_move(480.0, 10.0, 5.0);
        // Near half of column 3 → insert 3 == source: no-op.
        assert_eq!(ctl.drop_index(&coord, 460.0), None);
        // Far half of column 3 → insert 4 == source + 1: no-op.
        assert_eq!(ctl.drop_index(&coord, 590.0), None);
        // Near half of column 4 → insert 4 == source + 1: still a no-op.
        assert_eq!(ctl.drop_index(&coord, 610.0), None);
        // Far half of column 4 → insert 5: a real move.
        assert_eq!(ctl.drop_index(&coord, 740.0), Some(5));
    }

    #[test]
    fn test_row_drag_uses_vertical_axis() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Row, 0, 30.0, 16.0, 0.0);
        assert!(ctl.on_pointer_move(30.0, 100.0, 5.0));
        // Row 10 spans 320..352; 330 is in the near half.
        assert_eq!(ctl.drop_index(&coord, 330.0), Some(10));
    }

    #[test]
    fn test_finish_clears_state() {
        let coord = coord();
        let mut ctl = DragReorderController::new();
        ctl.arm(DragType::Row, 1, 0.0, 40.0, 32.0);
        ctl.on_pointer_move(0.0, 200.0, 5.0);
        assert!(ctl.finish(&coord, 330.0).is_some());
        assert_eq!(ctl.state(), DragState::default());
    }
}
