//! Per-frame orchestration between the viewport, the engine and the
//! collaborators that consume engine events.

use std::io::Write;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::core::engine::EngineEvent;
use crate::core::scroll::ScrollViewport;

use super::state::AppState;

/// Feed the stack pane's size to the engine.  Scrolls to the bottom on the
/// first layout (instantly) and whenever the item count or height changes
/// (animated), so the newest card stays at the front.
pub fn sync_layout(state: &mut AppState, stack_area: Rect) {
    let viewport_height = stack_area.height as f64 * state.config.px_per_row;
    if viewport_height != state.engine.viewport_height() {
        state.engine.set_viewport_height(viewport_height);
    }
    let max_scroll = state.engine.geometry().max_scroll();
    state.viewport.set_max_scroll(max_scroll);

    let layout = (state.engine.items().len(), viewport_height);
    match state.last_layout {
        None => {
            state.viewport.set_scroll_top(max_scroll, false);
            state.engine.reset_scroll(max_scroll);
        }
        Some(previous) if previous != layout => {
            tracing::debug!(items = layout.0, height = layout.1, "layout changed");
            state.viewport.set_scroll_top(max_scroll, true);
        }
        Some(_) => {}
    }
    state.last_layout = Some(layout);
}

/// Advance one frame: step the scroll animation, run the engine and route
/// its events.  Bells go to `bell`.
pub fn advance_frame(state: &mut AppState, dt: Duration, now: Instant, bell: &mut dyn Write) {
    state.viewport.tick(dt);
    notify_scroll(state, now);

    state.engine.tick(dt, now);

    for event in state.engine.drain_events() {
        state.feedback.play(&event, bell);
        match event {
            EngineEvent::CardActivated(note) => state.open_detail(note),
            EngineEvent::PulledOut(key) => {
                let title = state
                    .engine
                    .index_of(&key)
                    .and_then(|i| state.engine.items()[i].note())
                    .map(|n| n.title().to_string())
                    .unwrap_or(key);
                state.status_message = Some(format!("{title}  (click again or Enter to open)"));
            }
            EngineEvent::PutBack(_) => state.status_message = None,
            EngineEvent::FeedbackTick | EngineEvent::ClickSound => {}
        }
    }
}

/// Report the viewport position to the engine if it moved since the
/// engine last saw it.
pub fn notify_scroll(state: &mut AppState, now: Instant) {
    if state.viewport.scroll_top() != state.engine.scroll_state().scroll_top {
        state.engine.on_scroll(&state.viewport, now);
    }
}
