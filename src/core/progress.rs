//! Per-card pull-out progress.
//!
//! Progress is a linear ramp in `[0, 1]` driven by real elapsed time.  The
//! quartic ease is a display concern only; the ramp itself never looks at it.

use std::collections::HashMap;

/// Progress per second while moving toward the pulled-out position.
pub const PULL_OUT_RATE: f64 = 3.0;
/// Progress per second while moving back into the stack.
pub const RETRACT_RATE: f64 = 2.5;
/// Below this distance the value snaps onto its target.
const SETTLE_EPSILON: f64 = 0.001;

/// Quartic ease-out: `1 - (1 - p)^4`, input clamped to `[0, 1]`.
pub fn ease_out_quart(p: f64) -> f64 {
    let inv = 1.0 - p.clamp(0.0, 1.0);
    1.0 - inv * inv * inv * inv
}

/// Key → progress.  Entries are created on first touch and kept for the
/// lifetime of the map.
#[derive(Debug, Default)]
pub struct CardProgress {
    values: HashMap<String, f64>,
}

impl CardProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current progress (0 for keys never touched).
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Advance `key` toward 1 (`pulled == true`) or 0 by `dt` seconds and
    /// return the new raw progress.
    pub fn step(&mut self, key: &str, pulled: bool, dt: f64) -> f64 {
        let target = if pulled { 1.0 } else { 0.0 };
        let current = self.get(key);

        let next = if (current - target).abs() > SETTLE_EPSILON {
            let rate = if pulled { PULL_OUT_RATE } else { RETRACT_RATE };
            let delta = rate * dt.max(0.0);
            if current < target {
                (current + delta).min(target)
            } else {
                (current - delta).max(target)
            }
        } else {
            target
        };

        let next = next.clamp(0.0, 1.0);
        match self.values.get_mut(key) {
            Some(v) => *v = next,
            None => {
                self.values.insert(key.to_string(), next);
            }
        }
        next
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}
