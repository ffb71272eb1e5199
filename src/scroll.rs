//! Scroll state for the two scroll surfaces.
//!
//! Owns the logical scroll offsets, clamps them to content bounds, translates
//! native wheel deltas into snapped or smooth offsets, and implements the
//! programmatic `scroll_to_item` / `scroll_by` API. Scroll-settle debounce
//! bookkeeping lives here too: the viewer notes each scroll and asks whether
//! the surface has settled, last write wins.

use serde::{Deserialize, Serialize};

use crate::layout::CoordinateManager;
use crate::types::CellCoord;

/// How a wheel delta should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollMode {
    /// Raw pixel delta.
    #[default]
    Pixel,
    /// Delta is in lines; snapped to whole row heights.
    Line,
    /// Delta is in pages; snapped to whole viewport heights.
    Page,
}

/// Logical scroll offsets plus settle-debounce state.
#[derive(Debug, Clone, Default)]
pub struct ScrollVirtualizer {
    scroll_left: f32,
    scroll_top: f32,
    last_scroll_ms: f64,
    settle_pending: bool,
}

impl ScrollVirtualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn max_scroll_left(coord: &CoordinateManager) -> f32 {
        (coord.total_width() - coord.container_width()).max(0.0)
    }

    fn max_scroll_top(coord: &CoordinateManager) -> f32 {
        (coord.total_height() - coord.container_height()).max(0.0)
    }

    /// Set absolute offsets, clamped to `[0, content - viewport]`.
    /// Returns true when either offset actually changed.
    pub fn set_scroll(&mut self, coord: &CoordinateManager, left: f32, top: f32) -> bool {
        let new_left = left.clamp(0.0, Self::max_scroll_left(coord));
        let new_top = top.clamp(0.0, Self::max_scroll_top(coord));
        let changed = (new_left - self.scroll_left).abs() > f32::EPSILON
            || (new_top - self.scroll_top).abs() > f32::EPSILON;
        self.scroll_left = new_left;
        self.scroll_top = new_top;
        changed
    }

    /// Apply a relative delta. Returns true when the offsets changed.
    pub fn scroll_by(&mut self, coord: &CoordinateManager, dx: f32, dy: f32) -> bool {
        self.set_scroll(coord, self.scroll_left + dx, self.scroll_top + dy)
    }

    /// Translate a native wheel delta into logical pixels.
    pub fn wheel_delta(&self, coord: &CoordinateManager, delta: f32, mode: ScrollMode) -> f32 {
        match mode {
            ScrollMode::Pixel => delta,
            ScrollMode::Line => delta * coord.row_height_at(0),
            ScrollMode::Page => delta * coord.container_height(),
        }
    }

    /// Minimal scroll needed to bring `[col, row]` fully into the non-frozen
    /// viewport, biased toward whichever edge is violated. Frozen columns are
    /// always visible, so they never force a horizontal scroll.
    /// Returns true when the offsets changed.
    pub fn scroll_to_item(&mut self, coord: &CoordinateManager, item: CellCoord) -> bool {
        let [col, row] = item;
        let mut target_left = self.scroll_left;
        let mut target_top = self.scroll_top;

        if row < coord.row_count() {
            let top = coord.row_offset(row);
            let bottom = top + coord.row_height_at(row);
            let view_top = self.scroll_top + coord.row_initial_size();
            let view_bottom = self.scroll_top + coord.container_height();
            if top < view_top {
                target_top = top - coord.row_initial_size();
            } else if bottom > view_bottom {
                target_top = bottom - coord.container_height();
            }
        }

        if col >= coord.freeze_column_count() && col < coord.column_count() {
            let left = coord.column_offset(col);
            let right = left + coord.column_width_at(col);
            let view_left = self.scroll_left + coord.freeze_region_width();
            let view_right = self.scroll_left + coord.container_width();
            if left < view_left {
                target_left = left - coord.freeze_region_width();
            } else if right > view_right {
                target_left = right - coord.container_width();
            }
        }

        self.set_scroll(coord, target_left, target_top)
    }

    /// Record scroll activity for the settle debounce.
    pub fn note_scroll(&mut self, now_ms: f64) {
        self.last_scroll_ms = now_ms;
        self.settle_pending = true;
    }

    /// True exactly once after scrolling has been quiet for `delay_ms`.
    pub fn take_settled(&mut self, now_ms: f64, delay_ms: f64) -> bool {
        if self.settle_pending && now_ms - self.last_scroll_ms >= delay_ms {
            self.settle_pending = false;
            return true;
        }
        false
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

    fn coord(rows: usize, cols: usize) -> CoordinateManager {
        CoordinateManager::new(CoordinateOptions {
            row_count: rows,
            column_count: cols,
            container_width: 800.0,
            container_height: 600.0,
            ..CoordinateOptions::default()
        })
    }

    #[test]
    fn test_clamping() {
        let coord = coord(1000, 100);
        let mut scroll = ScrollVirtualizer::new();
        assert!(scroll.set_scroll(&coord, -50.0, 1e9));
        assert_eq!(scroll.scroll_left(), 0.0);
        assert_eq!(scroll.scroll_top(), 1000.0 * 32.0 - 600.0);
    }

    #[test]
    fn test_scroll_by_reports_change() {
        let coord = coord(1000, 100);
        let mut scroll = ScrollVirtualizer::new();
        assert!(scroll.scroll_by(&coord, 0.0, 10.0));
        assert!(!scroll.scroll_by(&coord, 0.0, 0.0));
        assert!(!scroll.scroll_by(&coord, -100.0, 0.0));
    }

    #[test]
    fn test_scroll_to_item_bottom_aligns() {
        // Container 800x600, row height 32, 1000 rows, no prior scroll:
        // row 999 lands bottom-aligned.
        let coord = coord(1000, 100);
        let mut scroll = ScrollVirtualizer::new();
        assert!(scroll.scroll_to_item(&coord, [0, 999]));
        assert_eq!(scroll.scroll_top(), 999.0 * 32.0 - (600.0 - 32.0));
        assert_eq!(scroll.scroll_left(), 0.0);
    }

    #[test]
    fn test_scroll_to_item_noop_when_visible() {
        let coord = coord(1000, 100);
        let mut scroll = ScrollVirtualizer::new();
        assert!(!scroll.scroll_to_item(&coord, [0, 5]));
        assert_eq!(scroll.scroll_top(), 0.0);
    }

    #[test]
    fn test_scroll_to_item_top_aligns_upward() {
        let coord = coord(1000, 100);
        let mut scroll = ScrollVirtualizer::new();
        scroll.set_scroll(&coord, 0.0, 3200.0);
        assert!(scroll.scroll_to_item(&coord, [0, 10]));
        assert_eq!(scroll.scroll_top(), 10.0 * 32.0);
    }

    #[test]
    fn test_scroll_to_frozen_column_never_scrolls_horizontally() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 100,
            column_count: 100,
            container_width: 800.0,
            container_height: 600.0,
            freeze_column_count: 2,
            ..CoordinateOptions::default()
        });
        let mut scroll = ScrollVirtualizer::new();
        scroll.set_scroll(&coord, 5000.0, 0.0);
        scroll.scroll_to_item(&coord, [1, 0]);
        assert_eq!(scroll.scroll_left(), 5000.0);
    }

    #[test]
    fn test_settle_debounce_last_write_wins() {
        let mut scroll = ScrollVirtualizer::new();
        scroll.note_scroll(0.0);
        assert!(!scroll.take_settled(50.0, 100.0));
        scroll.note_scroll(80.0);
        // The second scroll reset the window.
        assert!(!scroll.take_settled(150.0, 100.0));
        assert!(scroll.take_settled(181.0, 100.0));
        // Fires exactly once.
        assert!(!scroll.take_settled(500.0, 100.0));
    }

    #[test]
    fn test_wheel_delta_snapping() {
        let coord = coord(100, 10);
        let scroll = ScrollVirtualizer::new();
        assert_eq!(scroll.wheel_delta(&coord, 3.0, ScrollMode::Line), 96.0);
        assert_eq!(scroll.wheel_delta(&coord, 1.0, ScrollMode::Page), 600.0);
        assert_eq!(scroll.wheel_delta(&coord, 42.0, ScrollMode::Pixel), 42.0);
    }
}
