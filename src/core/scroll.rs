//! Scroll tracking: position, per-event velocity and rate-limited side effects.

use std::time::{Duration, Instant};

use super::stack::{natural_top, CARD_CENTER_OFFSET, PULLED_OFFSET};

/// Per-frame velocity multiplier.
pub const FRICTION: f64 = 0.92;
/// Velocities below this magnitude snap to zero.
const VELOCITY_FLOOR: f64 = 0.1;
/// Scroll distance between two feedback ticks (px).
pub const FEEDBACK_DISTANCE: f64 = 80.0;
/// Window after a programmatic scroll during which scrolling never dismisses a preview.
pub const AUTO_SCROLL_GRACE: Duration = Duration::from_millis(800);
/// Minimum per-event movement that counts as a deliberate user scroll (px).
pub const DISMISS_DISTANCE: f64 = 10.0;

/// The scrollable surface the engine reads from and steers.
///
/// Implementations decide what "animated" means; the engine only asks for a
/// destination.
pub trait ScrollViewport {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, value: f64, animated: bool);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_top: f64,
    pub velocity: f64,
}

/// What a single scroll event asks the rest of the engine to do.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSample {
    pub delta: f64,
    /// Emit one sound/haptic tick.
    pub feedback: bool,
    /// Put back the previewed card.
    pub dismiss: bool,
}

#[derive(Debug, Default)]
pub struct ScrollTracker {
    state: ScrollState,
    last_scroll_top: f64,
    last_feedback_top: f64,
    last_auto_scroll: Option<Instant>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Handle one native scroll event at position `current`.
    pub fn on_scroll(&mut self, current: f64, previewing: bool, now: Instant) -> ScrollSample {
        let delta = current - self.last_scroll_top;

        let dismiss =
            previewing && !self.in_auto_scroll_grace(now) && delta.abs() > DISMISS_DISTANCE;

        let feedback = (current - self.last_feedback_top).abs() > FEEDBACK_DISTANCE;
        if feedback {
            self.last_feedback_top = current;
        }

        self.last_scroll_top = current;
        self.state.scroll_top = current;
        self.state.velocity = delta;

        ScrollSample {
            delta,
            feedback,
            dismiss,
        }
    }

    fn in_auto_scroll_grace(&self, now: Instant) -> bool {
        self.last_auto_scroll
            .is_some_and(|at| now.saturating_duration_since(at) < AUTO_SCROLL_GRACE)
    }

    /// Smoothly scroll so the pulled-out card at `index` is centered, and
    /// open the dismissal grace window.  Returns the requested position.
    pub fn auto_center(
        &mut self,
        index: usize,
        viewport_height: f64,
        viewport: &mut dyn ScrollViewport,
        now: Instant,
    ) -> f64 {
        let target = auto_center_target(index, viewport_height);
        self.last_auto_scroll = Some(now);
        viewport.set_scroll_top(target, true);
        target
    }

    /// Jump without producing velocity or feedback (initial placement).
    pub fn reset_to(&mut self, scroll_top: f64) {
        self.state = ScrollState {
            scroll_top,
            velocity: 0.0,
        };
        self.last_scroll_top = scroll_top;
        self.last_feedback_top = scroll_top;
    }

    /// Apply one frame of friction.
    pub fn decay(&mut self) {
        self.state.velocity *= FRICTION;
        if self.state.velocity.abs() < VELOCITY_FLOOR {
            self.state.velocity = 0.0;
        }
    }
}

/// Scroll position that centers the pulled-out card at `index`.
pub fn auto_center_target(index: usize, viewport_height: f64) -> f64 {
    let pulled_top = natural_top(index) + PULLED_OFFSET;
    (pulled_top + CARD_CENTER_OFFSET - viewport_height * 0.5).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::STACK_START;

    #[derive(Default)]
    struct Recorder {
        top: f64,
        requests: Vec<(f64, bool)>,
    }

    impl ScrollViewport for Recorder {
        fn scroll_top(&self) -> f64 {
            self.top
        }
        fn set_scroll_top(&mut self, value: f64, animated: bool) {
            self.requests.push((value, animated));
        }
    }

    #[test]
    fn velocity_is_the_latest_delta_not_a_sum() {
        let mut t = ScrollTracker::new();
        let now = Instant::now();
        t.on_scroll(30.0, false, now);
        t.on_scroll(35.0, false, now);
        assert_eq!(t.state().velocity, 5.0);
        assert_eq!(t.state().scroll_top, 35.0);
    }

    #[test]
    fn friction_decays_to_zero() {
        let mut t = ScrollTracker::new();
        t.on_scroll(50.0, false, Instant::now());
        t.decay();
        assert!((t.state().velocity - 46.0).abs() < 1e-9);
        for _ in 0..200 {
            t.decay();
        }
        assert_eq!(t.state().velocity, 0.0);
    }

    #[test]
    fn feedback_fires_every_eighty_pixels() {
        let mut t = ScrollTracker::new();
        let now = Instant::now();
        assert!(!t.on_scroll(50.0, false, now).feedback);
        assert!(t.on_scroll(81.0, false, now).feedback);
        assert!(!t.on_scroll(150.0, false, now).feedback);
        assert!(t.on_scroll(162.0, false, now).feedback);
        assert!(t.on_scroll(0.0, false, now).feedback);
    }

    #[test]
    fn dismiss_needs_preview_and_real_movement() {
        let mut t = ScrollTracker::new();
        let now = Instant::now();
        assert!(!t.on_scroll(50.0, false, now).dismiss);
        assert!(!t.on_scroll(55.0, true, now).dismiss);
        assert!(t.on_scroll(70.0, true, now).dismiss);
    }

    #[test]
    fn auto_center_suppresses_dismissal_for_the_grace_window() {
        let mut t = ScrollTracker::new();
        let mut vp = Recorder::default();
        let start = Instant::now();
        let target = t.auto_center(8, 800.0, &mut vp, start);
        assert_eq!(vp.requests, vec![(target, true)]);

        let s = t.on_scroll(50.0, true, start + Duration::from_millis(500));
        assert!(!s.dismiss);
        let s = t.on_scroll(100.0, true, start + Duration::from_millis(900));
        assert!(s.dismiss);
    }

    #[test]
    fn auto_center_target_matches_layout() {
        let expected = (STACK_START + 8.0 * 70.0 - 480.0 + 250.0) - 400.0;
        assert!((auto_center_target(8, 800.0) - expected).abs() < 1e-9);
        assert_eq!(auto_center_target(0, 4000.0), 0.0);
    }
}
