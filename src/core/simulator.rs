//! Frame simulator: per-card 3D transform, opacity and filter values.
//!
//! ## Model
//!
//! * **Depth**: a card's on-screen position is mapped into
//!   `stack_progress ∈ [0, 1]` between `VIEW_START` and 40% of the viewport.
//!   `curve = (1 - stack_progress)^3` concentrates depth effects near the
//!   back of the visible stack.
//! * **Stack physics**: `curve` drives z-depth, scale, tilt, blur and
//!   brightness.
//! * **Secondary motion**: the current scroll velocity nudges and
//!   counter-tilts the cards, less so for deep cards.
//! * **Pull-out blend**: the eased progress blends offset, blur,
//!   brightness and tilt toward the pulled-out values.  Depth and scale
//!   are left as the stack computes them.

use super::element::ElementRegistry;
use super::progress::{ease_out_quart, CardProgress};
use super::scroll::ScrollState;
use super::stack::{natural_top, StackItem, PULLED_OFFSET};

const VIEW_START: f64 = -100.0;
const VIEW_END_FRACTION: f64 = 0.4;

const NEAR_Z: f64 = 100.0;
const FAR_Z: f64 = -900.0;
const NEAR_SCALE: f64 = 1.0;
const FAR_SCALE: f64 = 0.85;
const FAR_TILT_DEG: f64 = -15.0;
const FAR_BLUR: f64 = 6.0;
const FAR_DIMMING: f64 = 0.4;

const COUNTER_TILT: f64 = -0.05;

/// Culling window around the viewport (px above / below).
const CULL_ABOVE: f64 = -1000.0;
const CULL_BELOW: f64 = 400.0;
/// Raw progress above which a card is always rendered.
const PULLED_VISIBLE: f64 = 0.01;

/// Input device class; touch screens get gentler secondary motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputProfile {
    #[default]
    Pointer,
    Touch,
}

impl InputProfile {
    pub fn max_velocity(self) -> f64 {
        match self {
            InputProfile::Pointer => 60.0,
            InputProfile::Touch => 30.0,
        }
    }

    pub fn velocity_dampener(self) -> f64 {
        match self {
            InputProfile::Pointer => 0.6,
            InputProfile::Touch => 0.3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InputProfile::Pointer => "pointer",
            InputProfile::Touch => "touch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pointer" | "mouse" => Some(InputProfile::Pointer),
            "touch" => Some(InputProfile::Touch),
            _ => None,
        }
    }
}

/// Render parameters for one card, in the engine's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardRender {
    /// Absolute top of the card in scroll-content coordinates.
    pub top: f64,
    pub translate_y: f64,
    pub translate_z: f64,
    pub scale: f64,
    /// Rotation about the X axis, degrees.
    pub tilt_deg: f64,
    pub blur: f64,
    pub brightness: f64,
    pub opacity: f64,
    pub z_index: usize,
    /// Rendered and interactive.  Hidden cards keep their other values.
    pub visible: bool,
    /// Raw (un-eased) pull-out progress this frame.
    pub progress: f64,
}

/// Depth falloff for a card whose top sits at `screen_y`.
pub fn depth_curve(screen_y: f64, viewport_height: f64) -> f64 {
    let view_end = viewport_height * VIEW_END_FRACTION;
    let range = (view_end - VIEW_START).max(f64::EPSILON);
    let stack_progress = ((screen_y - VIEW_START) / range).clamp(0.0, 1.0);
    let depth = 1.0 - stack_progress;
    depth * depth * depth
}

/// Compute one card's parameters from scroll state and raw progress.
pub fn card_render(
    index: usize,
    scroll: ScrollState,
    viewport_height: f64,
    profile: InputProfile,
    progress: f64,
) -> CardRender {
    let progress = progress.clamp(0.0, 1.0);
    let eased = ease_out_quart(progress);

    let top = natural_top(index);
    let screen_y = top - scroll.scroll_top;
    let curve = depth_curve(screen_y, viewport_height);

    let translate_z = NEAR_Z + curve * (FAR_Z - NEAR_Z);
    let scale = NEAR_SCALE + curve * (FAR_SCALE - NEAR_SCALE);
    let tilt = FAR_TILT_DEG * curve;

    let max_v = profile.max_velocity();
    let velocity = scroll.velocity.clamp(-max_v, max_v);
    let v_offset = velocity * profile.velocity_dampener() * (1.0 - curve * 0.5);
    let v_tilt = velocity * COUNTER_TILT * (1.0 - curve);

    let stack_blur = curve * FAR_BLUR;
    let stack_brightness = 1.0 - curve * FAR_DIMMING;
    let stack_tilt = tilt + v_tilt;

    // Pulled-out targets: no blur, full brightness, flat.
    let blur = stack_blur * (1.0 - eased);
    let brightness = stack_brightness * (1.0 - eased) + eased;
    let tilt_deg = stack_tilt * (1.0 - eased);
    let translate_y = v_offset + eased * PULLED_OFFSET;

    let visible = progress > PULLED_VISIBLE
        || (screen_y > CULL_ABOVE && screen_y < viewport_height + CULL_BELOW);

    let opacity = if !visible {
        0.0
    } else if progress > 0.0 {
        1.0
    } else {
        1.0 - curve * FAR_DIMMING
    };

    CardRender {
        top,
        translate_y,
        translate_z,
        scale,
        tilt_deg,
        blur,
        brightness,
        opacity,
        z_index: index,
        visible,
        progress,
    }
}

/// Runs one simulation pass over the deck.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSimulator {
    pub profile: InputProfile,
}

impl FrameSimulator {
    pub fn new(profile: InputProfile) -> Self {
        Self { profile }
    }

    /// Advance progress by `dt` seconds and write fresh render parameters
    /// into every mounted element.  Returns the number of visible cards.
    pub fn run(
        &self,
        items: &[StackItem],
        pulled_key: Option<&str>,
        scroll: ScrollState,
        viewport_height: f64,
        dt: f64,
        progress: &mut CardProgress,
        elements: &mut ElementRegistry,
    ) -> usize {
        let mut visible = 0;
        for (index, item) in items.iter().enumerate() {
            let key = item.key();
            let Some(element) = elements.get_mut(key) else {
                continue;
            };
            let raw = progress.step(key, pulled_key == Some(key), dt);
            let render = card_render(index, scroll, viewport_height, self.profile, raw);
            if render.visible {
                visible += 1;
            }
            element.render = Some(render);
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::{HEADER_OFFSET, STACK_START};

    const VH: f64 = 800.0;

    fn at_rest(scroll_top: f64) -> ScrollState {
        ScrollState {
            scroll_top,
            velocity: 0.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn curve_is_zero_at_the_focus_line_and_one_above_the_view() {
        assert_eq!(depth_curve(VH * 0.4, VH), 0.0);
        assert_eq!(depth_curve(VH, VH), 0.0);
        assert_eq!(depth_curve(-100.0, VH), 1.0);
        assert_eq!(depth_curve(-500.0, VH), 1.0);
        let mid = depth_curve((VH * 0.4 - 100.0) / 2.0, VH);
        assert!(close(mid, 0.125));
    }

    #[test]
    fn front_card_is_near_and_sharp() {
        // Put card 0 exactly on the focus line.
        let scroll = at_rest(STACK_START - VH * 0.4);
        let r = card_render(0, scroll, VH, InputProfile::Pointer, 0.0);
        assert!(close(r.translate_z, 100.0));
        assert!(close(r.scale, 1.0));
        assert!(close(r.tilt_deg, 0.0));
        assert!(close(r.blur, 0.0));
        assert!(close(r.brightness, 1.0));
        assert!(close(r.opacity, 1.0));
        assert!(r.visible);
    }

    #[test]
    fn deep_card_is_far_small_tilted_and_dim() {
        let scroll = at_rest(STACK_START + 100.0);
        let r = card_render(0, scroll, VH, InputProfile::Pointer, 0.0);
        assert!(close(r.translate_z, -900.0));
        assert!(close(r.scale, 0.85));
        assert!(close(r.tilt_deg, -15.0));
        assert!(close(r.blur, 6.0));
        assert!(close(r.brightness, 0.6));
        assert!(close(r.opacity, 0.6));
    }

    #[test]
    fn velocity_is_clamped_per_profile() {
        let scroll = ScrollState {
            scroll_top: STACK_START - VH * 0.4,
            velocity: 500.0,
        };
        let pointer = card_render(0, scroll, VH, InputProfile::Pointer, 0.0);
        let touch = card_render(0, scroll, VH, InputProfile::Touch, 0.0);
        assert!(close(pointer.translate_y, 60.0 * 0.6));
        assert!(close(touch.translate_y, 30.0 * 0.3));
        assert!(close(pointer.tilt_deg, 60.0 * -0.05));
    }

    #[test]
    fn fully_pulled_card_is_flat_sharp_and_opaque_but_keeps_depth() {
        let scroll = at_rest(STACK_START + 100.0);
        let stack = card_render(0, scroll, VH, InputProfile::Pointer, 0.0);
        let pulled = card_render(0, scroll, VH, InputProfile::Pointer, 1.0);
        assert!(close(pulled.translate_y, PULLED_OFFSET));
        assert!(close(pulled.blur, 0.0));
        assert!(close(pulled.brightness, 1.0));
        assert!(close(pulled.tilt_deg, 0.0));
        assert!(close(pulled.opacity, 1.0));
        assert_eq!(pulled.translate_z, stack.translate_z);
        assert_eq!(pulled.scale, stack.scale);
    }

    #[test]
    fn culling_hides_far_offscreen_cards_unless_pulled() {
        let scroll = at_rest(0.0);
        // Card 20 sits at 600 + 1400 = 2000px, past 800 + 400.
        let hidden = card_render(20, scroll, VH, InputProfile::Pointer, 0.0);
        assert!(!hidden.visible);
        assert_eq!(hidden.opacity, 0.0);
        let pulled = card_render(20, scroll, VH, InputProfile::Pointer, 0.5);
        assert!(pulled.visible);
        assert_eq!(pulled.opacity, 1.0);
    }

    #[test]
    fn z_index_and_top_follow_stack_index() {
        let r = card_render(7, at_rest(0.0), VH, InputProfile::Pointer, 1.0);
        assert_eq!(r.z_index, 7);
        assert!(close(r.top, STACK_START + 7.0 * HEADER_OFFSET));
    }
}
