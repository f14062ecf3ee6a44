//! Terminal scroll viewport with exponential ease-out.
//!
//! Programmatic scrolls (`animated == true`) close a fixed fraction of the
//! remaining distance per reference frame, scaled by the real elapsed time,
//! so the content decelerates into place in the same wall-clock time at any
//! frame rate.  User scrolls jump immediately and cancel any animation in
//! flight.

use std::time::Duration;

use crate::core::scroll::ScrollViewport;

/// Below this distance the animation snaps onto its destination (px).
const SNAP_DISTANCE: f64 = 0.5;
/// Frame length `speed` is expressed against.
const REFERENCE_FRAME: Duration = Duration::from_millis(16);

/// Scroll position of the stack area, in engine pixels.
#[derive(Debug, Clone)]
pub struct TerminalViewport {
    scroll_top: f64,
    max_scroll: f64,
    /// Destination of the animation in flight.
    target: Option<f64>,
    /// Damping: `remaining *= (1 - speed)` per reference frame.
    /// Good range: 0.15 to 0.35.
    speed: f64,
}

impl TerminalViewport {
    pub fn new(speed: f64) -> Self {
        Self {
            scroll_top: 0.0,
            max_scroll: 0.0,
            target: None,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// Update the scrollable range, clamping the position and any target.
    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        self.max_scroll = max_scroll.max(0.0);
        self.scroll_top = self.clamp(self.scroll_top);
        self.target = self.target.map(|t| self.clamp(t));
    }

    /// User-driven scroll.  Returns `true` if the position changed.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.target = None;
        let before = self.scroll_top;
        self.scroll_top = self.clamp(self.scroll_top + delta);
        self.scroll_top != before
    }

    /// Advance the animation by `dt`.  Returns `true` if the position
    /// changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let frames = dt.as_secs_f64() / REFERENCE_FRAME.as_secs_f64();
        let covered = 1.0 - (1.0 - self.speed).powf(frames);
        let before = self.scroll_top;
        self.scroll_top += (target - self.scroll_top) * covered;
        if (target - self.scroll_top).abs() < SNAP_DISTANCE {
            self.scroll_top = target;
            self.target = None;
        }
        self.scroll_top != before
    }

    /// True while an animated scroll is still moving.
    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(0.0, self.max_scroll)
    }
}

impl ScrollViewport for TerminalViewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, value: f64, animated: bool) {
        let value = self.clamp(value);
        if animated {
            self.target = Some(value);
        } else {
            self.target = None;
            self.scroll_top = value;
        }
    }
}
