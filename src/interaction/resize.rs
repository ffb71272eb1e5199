//! Column-resize drag state machine.

use crate::types::{ColumnResizeState, InteractionConfig};

/// Drives [`ColumnResizeState`] from pointer events on a resize handle.
///
/// The live width is the anchor width plus horizontal pointer travel, clamped
/// to the configured minimum. The host is notified of the live width on every
/// move so it can show a preview; the final width is committed on `finish`.
#[derive(Debug, Default)]
pub struct ColumnResizeController {
    state: ColumnResizeState,
    anchor_width: f32,
}

impl ColumnResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ColumnResizeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Begin resizing `column` whose current width is `width`.
    pub fn begin(&mut self, column: usize, width: f32, anchor_x: f32) {
        self.state = ColumnResizeState {
            column_index: Some(column),
            width,
            anchor_x,
        };
        self.anchor_width = width;
    }

    /// Track the pointer. Returns the new live width when it changed.
    pub fn on_pointer_move(&mut self, x: f32, config: &InteractionConfig) -> Option<f32> {
        self.state.column_index?;
        let width = (self.anchor_width + x - self.state.anchor_x).max(config.min_column_width);
        if (width - self.state.width).abs() <= f32::EPSILON {
            return None;
        }
        self.state.width = width;
        Some(width)
    }

    /// Commit the resize. Returns `(column, final width)` and clears state.
    pub fn finish(&mut self) -> Option<(usize, f32)> {
        let result = self.state.column_index.map(|col| (col, self.state.width));
        self.state = ColumnResizeState::default();
        result
    }

    /// Abandon without committing.
    pub fn reset(&mut self) {
        self.state = ColumnResizeState::default();
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
    fn test_live_width_tracks_pointer() {
        let config = InteractionConfig::default();
        let mut ctl = ColumnResizeController::new();
        ctl.begin(2, 150.0, 300.0);
        assert_eq!(ctl.on_pointer_move(340.0, &config), Some(190.0));
        assert_eq!(ctl.on_pointer_move(340.0, &config), None);
        assert_eq!(ctl.finish(), Some((2, 190.0)));
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_width_clamps_to_minimum() {
        let config = InteractionConfig::default();
        let mut ctl = ColumnResizeController::new();
        ctl.begin(0, 150.0, 300.0);
        assert_eq!(ctl.on_pointer_move(0.0, &config), Some(100.0));
        // Further travel past the clamp produces no new value.
        assert_eq!(ctl.on_pointer_move(-500.0, &config), None);
        assert_eq!(ctl.finish(), Some((0, 100.0)));
    }

    #[test]
    fn test_reset_discards_drag() {
        let config = InteractionConfig::default();
        let mut ctl = ColumnResizeController::new();
        ctl.begin(1, 120.0, 200.0);
        ctl.on_pointer_move(260.0, &config);
        ctl.reset();
        assert_eq!(ctl.finish(), None);
    }

    #[test]
    fn test_move_without_begin_is_inert() {
        let config = InteractionConfig::default();
        let mut ctl = ColumnResizeController::new();
        assert_eq!(ctl.on_pointer_move(500.0, &config), None);
        assert_eq!(ctl.finish(), None);
    }
}
