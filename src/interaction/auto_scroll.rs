//! Edge-triggered autoscroll during selection drags.
//!
//! While a selection drag holds the pointer inside an edge band of the
//! viewport, each animation frame nudges the scroll toward that edge. Speed
//! ramps linearly from zero to the configured cap over the ramp interval of
//! continuous dwell, so a pointer that just grazes the band barely moves the
//! view while a parked pointer reaches full speed. The left band starts at
//! the freeze boundary because frozen columns never scroll.

use crate::layout::CoordinateManager;
use crate::types::InteractionConfig;

/// Per-frame scroll deltas driven by pointer dwell in the edge bands.
#[derive(Debug, Default)]
pub struct AutoScrollController {
    dir_x: f32,
    dir_y: f32,
    /// Timestamp the pointer entered a band, `None` while outside all bands.
    band_since: Option<f64>,
    last_tick: f64,
}

impl AutoScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.band_since.is_some()
    }

    /// Reclassify the pointer against the edge bands. Leaving every band
    /// resets the ramp.
    pub fn set_pointer(
        &mut self,
        coord: &CoordinateManager,
        config: &InteractionConfig,
        x: f32,
        y: f32,
        now_ms: f64,
    ) {
        let left_edge = coord.freeze_region_width();
        let top_edge = coord.row_initial_size();

        self.dir_x = if x < left_edge + config.auto_scroll_edge {
            -1.0
        } else if x > coord.container_width() - config.auto_scroll_edge {
            1.0
        } else {
            0.0
        };
        self.dir_y = if y < top_edge + config.auto_scroll_edge {
            -1.0
        } else if y > coord.container_height() - config.auto_scroll_edge {
            1.0
        } else {
            0.0
        };

        if self.dir_x == 0.0 && self.dir_y == 0.0 {
            self.band_since = None;
        } else if self.band_since.is_none() {
            self.band_since = Some(now_ms);
            self.last_tick = now_ms;
        }
    }

    /// Scroll delta for this frame, `(dx, dy)` in pixels. Zero while the
    /// pointer is outside the bands.
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_frame(&mut self, config: &InteractionConfig, now_ms: f64) -> (f32, f32) {
        let Some(since) = self.band_since else {
            return (0.0, 0.0);
        };
        let dt = (now_ms - self.last_tick).max(0.0);
        self.last_tick = now_ms;
        let ramp = ((now_ms - since) / config.auto_scroll_ramp_ms).clamp(0.0, 1.0) as f32;
        let step = config.auto_scroll_max_speed * ramp * dt as f32;
        (self.dir_x * step, self.dir_y * step)
    }

    /// Pointer-up or gesture abort.
    pub fn reset(&mut self) {
        self.dir_x = 0.0;
        self.dir_y = 0.0;
        self.band_since = None;
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
        CoordinateManager::new(CoordinateOptions {
            row_count: 1000,
            column_count: 100,
            container_width: 800.0,
            container_height: 600.0,
            ..CoordinateOptions::default()
        })
    }

    #[test]
    fn test_center_of_viewport_is_inert() {
        let coord = coord();
        let config = InteractionConfig::default();
        let mut ctl = AutoScrollController::new();
        ctl.set_pointer(&coord, &config, 400.0, 300.0, 0.0);
        assert!(!ctl.is_active());
        assert_eq!(ctl.on_frame(&config, 16.0), (0.0, 0.0));
    }

    #[test]
    fn test_ramp_reaches_full_speed() {
        let coord = coord();
        let config = InteractionConfig::default();
        let mut ctl = AutoScrollController::new();
        // Bottom-right corner: both axes scroll positive.
        ctl.set_pointer(&coord, &config, 790.0, 590.0, 0.0);
        assert!(ctl.is_active());

        // Halfway through the ramp, half speed.
        ctl.last_tick = 584.0;
        let (dx, dy) = ctl.on_frame(&config, 600.0);
        assert_eq!(dx, 1.5 * 0.5 * 16.0);
        assert_eq!(dy, dx);

        // Past the ramp, capped at max speed.
        ctl.last_tick = 1984.0;
        let (dx, _) = ctl.on_frame(&config, 2000.0);
        assert_eq!(dx, 1.5 * 16.0);
    }

    #[test]
    fn test_leaving_band_resets_ramp() {
        let coord = coord();
        let config = InteractionConfig::default();
        let mut ctl = AutoScrollController::new();
        ctl.set_pointer(&coord, &config, 790.0, 300.0, 0.0);
        ctl.set_pointer(&coord, &config, 400.0, 300.0, 2000.0);
        assert!(!ctl.is_active());
        // Re-entry starts the ramp over from zero.
        ctl.set_pointer(&coord, &config, 790.0, 300.0, 3000.0);
        let (dx, _) = ctl.on_frame(&config, 3000.0);
        assert_eq!(dx, 0.0);
    }

    #[test]
    fn test_left_band_respects_freeze_boundary() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 100,
            column_count: 100,
            container_width: 800.0,
            container_height: 600.0,
            freeze_column_count: 2,
            ..CoordinateOptions::default()
        });
        let config = InteractionConfig::default();
        let mut ctl = AutoScrollController::new();
        // Just right of the frozen region but inside its 30px band.
        let x = coord.freeze_region_width() + 10.0;
        ctl.set_pointer(&coord, &config, x, 300.0, 0.0);
        assert!(ctl.is_active());
        assert_eq!(ctl.dir_x, -1.0);
    }

    #[test]
    fn test_top_band_starts_below_header() {
        let coord = coord();
        let config = InteractionConfig::default();
        let mut ctl = AutoScrollController::new();
        let y = coord.row_initial_size() + 10.0;
        ctl.set_pointer(&coord, &config, 400.0, y, 0.0);
        assert_eq!(ctl.dir_y, -1.0);
    }
}
