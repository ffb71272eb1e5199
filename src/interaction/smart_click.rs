//! Single/double click disambiguation.
//!
//! A completed click is buffered for the double-click window instead of being
//! reported immediately. A second press inside the window and radius releases
//! the buffered single click and arms a double click for its release; when
//! the window lapses with no second press, `poll` releases the single click.
//! Pointer travel past the drag threshold between press and release
//! suppresses the click entirely (it was a drag, not a click).

use crate::types::InteractionConfig;

/// A resolved click, reported once disambiguation completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Single { x: f32, y: f32 },
    Double { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy)]
struct BufferedClick {
    x: f32,
    y: f32,
    at_ms: f64,
}

/// Buffers clicks until they can be classified as single or double.
#[derive(Debug, Default)]
pub struct SmartClickDisambiguator {
    buffered: Option<BufferedClick>,
    press_origin: Option<(f32, f32)>,
    suppressed: bool,
    double_armed: bool,
}

impl SmartClickDisambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    fn within(a: (f32, f32), b: (f32, f32), radius: f32) -> bool {
        let dx = a.0 - b.0;
        let dy = a.1 - b.1;
        (dx * dx + dy * dy).sqrt() <= radius
    }

    /// Pointer press. May release a previously buffered single click, either
    /// because this press promotes it to a double or because it went stale
    /// before `poll` ran.
    pub fn on_pointer_down(
        &mut self,
        config: &InteractionConfig,
        x: f32,
        y: f32,
        now_ms: f64,
    ) -> Option<ClickOutcome> {
        self.press_origin = Some((x, y));
        self.suppressed = false;
        self.double_armed = false;

        let prev = self.buffered.take()?;
        let in_window = now_ms - prev.at_ms <= config.double_click_window_ms;
        if in_window && Self::within((x, y), (prev.x, prev.y), config.double_click_radius) {
            self.double_armed = true;
        }
        Some(ClickOutcome::Single {
            x: prev.x,
            y: prev.y,
        })
    }

    /// Pointer travel since the press. Past the threshold the gesture is a
    /// drag and no click will be reported.
    pub fn on_pointer_move(&mut self, config: &InteractionConfig, x: f32, y: f32) {
        if let Some(origin) = self.press_origin {
            if !Self::within((x, y), origin, config.drag_threshold) {
                self.suppressed = true;
                self.double_armed = false;
            }
        }
    }

    /// Pointer release. Reports a double click when one was armed; otherwise
    /// buffers this click for later disambiguation.
    pub fn on_pointer_up(&mut self, x: f32, y: f32, now_ms: f64) -> Option<ClickOutcome> {
        self.press_origin = None;
        if self.suppressed {
            self.suppressed = false;
            return None;
        }
        if self.double_armed {
            self.double_armed = false;
            return Some(ClickOutcome::Double { x, y });
        }
        self.buffered = Some(BufferedClick { x, y, at_ms: now_ms });
        None
    }

    /// Release the buffered single click once its window has lapsed. Called
    /// from the frame tick.
    pub fn poll(&mut self, config: &InteractionConfig, now_ms: f64) -> Option<ClickOutcome> {
        let prev = self.buffered?;
        if now_ms - prev.at_ms <= config.double_click_window_ms {
            return None;
        }
        self.buffered = None;
        Some(ClickOutcome::Single {
            x: prev.x,
            y: prev.y,
        })
    }

    /// Drop everything (blur).
    pub fn reset(&mut self) {
        self.buffered = None;
        self.press_origin = None;
        self.suppressed = false;
        self.double_armed = false;
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
    fn test_lone_click_releases_after_window() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        assert_eq!(clicks.on_pointer_down(&config, 10.0, 20.0, 0.0), None);
        assert_eq!(clicks.on_pointer_up(10.0, 20.0, 10.0), None);
        // Still buffered inside the window.
        assert_eq!(clicks.poll(&config, 200.0), None);
        assert_eq!(
            clicks.poll(&config, 311.0),
            Some(ClickOutcome::Single { x: 10.0, y: 20.0 })
        );
        assert_eq!(clicks.poll(&config, 400.0), None);
    }

    #[test]
    fn test_rapid_second_click_fires_single_then_double() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        clicks.on_pointer_down(&config, 10.0, 20.0, 0.0);
        clicks.on_pointer_up(10.0, 20.0, 10.0);
        assert_eq!(
            clicks.on_pointer_down(&config, 12.0, 21.0, 150.0),
            Some(ClickOutcome::Single { x: 10.0, y: 20.0 })
        );
        assert_eq!(
            clicks.on_pointer_up(12.0, 21.0, 160.0),
            Some(ClickOutcome::Double { x: 12.0, y: 21.0 })
        );
        // Nothing left buffered.
        assert_eq!(clicks.poll(&config, 1000.0), None);
    }

    #[test]
    fn test_second_click_far_away_is_a_fresh_single() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        clicks.on_pointer_down(&config, 10.0, 20.0, 0.0);
        clicks.on_pointer_up(10.0, 20.0, 10.0);
        // Releases the stale single, does not arm a double.
        assert_eq!(
            clicks.on_pointer_down(&config, 300.0, 400.0, 100.0),
            Some(ClickOutcome::Single { x: 10.0, y: 20.0 })
        );
        assert_eq!(clicks.on_pointer_up(300.0, 400.0, 110.0), None);
        assert_eq!(
            clicks.poll(&config, 500.0),
            Some(ClickOutcome::Single { x: 300.0, y: 400.0 })
        );
    }

    #[test]
    fn test_slow_second_click_is_a_fresh_single() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        clicks.on_pointer_down(&config, 10.0, 20.0, 0.0);
        clicks.on_pointer_up(10.0, 20.0, 10.0);
        // Past the window even though poll never ran.
        assert!(clicks.on_pointer_down(&config, 10.0, 20.0, 500.0).is_some());
        assert_eq!(clicks.on_pointer_up(10.0, 20.0, 510.0), None);
        assert!(clicks.poll(&config, 900.0).is_some());
    }

    #[test]
    fn test_travel_suppresses_click() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        clicks.on_pointer_down(&config, 10.0, 20.0, 0.0);
        clicks.on_pointer_move(&config, 40.0, 20.0);
        assert_eq!(clicks.on_pointer_up(40.0, 20.0, 50.0), None);
        assert_eq!(clicks.poll(&config, 1000.0), None);
    }

    #[test]
    fn test_travel_on_second_press_cancels_double() {
        let config = InteractionConfig::default();
        let mut clicks = SmartClickDisambiguator::new();
        clicks.on_pointer_down(&config, 10.0, 20.0, 0.0);
        clicks.on_pointer_up(10.0, 20.0, 10.0);
        clicks.on_pointer_down(&config, 11.0, 20.0, 100.0);
        clicks.on_pointer_move(&config, 80.0, 20.0);
        assert_eq!(clicks.on_pointer_up(80.0, 20.0, 120.0), None);
    }
}
