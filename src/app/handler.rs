//! Input handling: maps key/mouse events to engine operations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::engine::Neighbor;
use crate::core::preview::ClickOutcome;
use crate::core::scroll::ScrollViewport;
use crate::ui::detail;
use crate::ui::layout::{point_in_rect, AppLayout};
use crate::ui::stack_widget::hit_test;

use super::frame_runtime::notify_scroll;
use super::state::{ActiveView, AppState};

/// Fraction of the viewport one page key moves.
const PAGE_FRACTION: f64 = 0.8;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Stack => handle_stack_key(state, key, now),
        ActiveView::Detail => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                state.close_detail();
            }
        }
    }
}

// ── Stack view (configurable bindings) ──────────────────────────

fn handle_stack_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let step = state.config.wheel_step_px;
    let page = state.engine.viewport_height() * PAGE_FRACTION;

    match action {
        Action::Quit => state.should_quit = true,
        Action::ScrollUp => scroll_by(state, -step, now),
        Action::ScrollDown => scroll_by(state, step, now),
        Action::PageUp => scroll_by(state, -page, now),
        Action::PageDown => scroll_by(state, page, now),
        Action::JumpTop => state.viewport.set_scroll_top(0.0, true),
        Action::JumpBottom => {
            let bottom = state.viewport.max_scroll();
            state.viewport.set_scroll_top(bottom, true);
        }
        Action::OpenCard => {
            // Confirm the preview, or open the front card directly.
            let index = state
                .engine
                .pulled_key()
                .and_then(|k| state.engine.index_of(k))
                .or_else(|| state.engine.items().len().checked_sub(1));
            if let Some(index) = index {
                state.engine.click_item(index, &mut state.viewport, now);
            }
        }
        Action::PullOlder => pull(state, Neighbor::Older, now),
        Action::PullNewer => pull(state, Neighbor::Newer, now),
        Action::PutBack => state.engine.put_back(now),
        Action::ToggleExport => toggle_export(state),
    }
}

fn pull(state: &mut AppState, direction: Neighbor, now: Instant) {
    let outcome = state
        .engine
        .pull_neighbor(direction, &mut state.viewport, now);
    if outcome.is_none() {
        let which = match direction {
            Neighbor::Older => "older",
            Neighbor::Newer => "newer",
        };
        state.status_message = Some(format!("No {which} note"));
    }
}

fn scroll_by(state: &mut AppState, delta: f64, now: Instant) {
    if state.viewport.scroll_by(delta) {
        notify_scroll(state, now);
    }
}

/// Enter export mode on the configured note (or the newest), or leave it.
pub fn toggle_export(state: &mut AppState) {
    if state.engine.is_export_mode() {
        state.engine.set_export_target(None);
        state.refresh_notes();
        state.status_message = None;
        return;
    }
    let target = state
        .export_id
        .clone()
        .or_else(|| state.all_notes.first().map(|n| n.id.clone()));
    match target {
        Some(id) => {
            tracing::info!(id = %id, "export mode");
            state.engine.set_export_target(Some(id));
            state.refresh_notes();
            let shown = state.engine.export_target().unwrap_or_default();
            state.status_message = Some(format!("Export view: {shown} (s to leave)"));
        }
        None => state.status_message = Some("No notes to export".into()),
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    if state.active_view == ActiveView::Detail {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let overlay = detail::overlay_area(state.terminal_area);
            if !point_in_rect(overlay, mouse.column, mouse.row) {
                state.close_detail();
            }
        }
        return;
    }

    let layout = AppLayout::from_area(state.terminal_area);
    let step = state.config.wheel_step_px;
    if !point_in_rect(layout.stack_area, mouse.column, mouse.row) {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match hit_test(&state.hit_zones, mouse.column, mouse.row) {
                Some(index) => {
                    let outcome = state.engine.click_item(index, &mut state.viewport, now);
                    if outcome == ClickOutcome::Ignored {
                        tracing::trace!(index, "click on blank card");
                    }
                }
                None => state.engine.background_tap(now),
            }
        }
        MouseEventKind::ScrollUp => scroll_by(state, -step, now),
        MouseEventKind::ScrollDown => scroll_by(state, step, now),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;

    use super::*;
    use crate::app::frame_runtime::{advance_frame, sync_layout};
    use crate::config::AppConfig;
    use crate::core::filter::NoteFilter;
    use crate::core::note::sample_notes;
    use crate::core::preview::PreviewState;
    use crate::ui::stack_widget::CardHitZone;

    fn state() -> AppState {
        let mut s = AppState::new(sample_notes(0), AppConfig::default());
        s.terminal_area = Rect::new(0, 0, 80, 51);
        let stack_area = AppLayout::from_area(s.terminal_area).stack_area;
        sync_layout(&mut s, stack_area);
        s
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn frame(s: &mut AppState, now: Instant) {
        advance_frame(s, Duration::from_millis(16), now, &mut Vec::<u8>::new());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut s = state();
        s.active_view = ActiveView::Detail;
        handle_key(
            &mut s,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(s.should_quit);
    }

    #[test]
    fn enter_opens_the_front_card_and_esc_closes_it() {
        let mut s = state();
        let now = Instant::now();
        handle_key(&mut s, press(KeyCode::Enter), now);
        frame(&mut s, now);
        assert_eq!(s.active_view, ActiveView::Detail);

        handle_key(&mut s, press(KeyCode::Esc), now);
        assert_eq!(s.active_view, ActiveView::Stack);
        assert!(s.detail.is_none());
    }

    #[test]
    fn pull_keys_walk_through_note_cards_only() {
        let mut s = state();
        let now = Instant::now();
        handle_key(&mut s, press(KeyCode::Char('k')), now);
        assert_eq!(s.engine.pulled_key(), Some("sample-4"));
        handle_key(&mut s, press(KeyCode::Char('j')), now);
        assert_eq!(s.engine.pulled_key(), Some("sample-5"));

        // Walk past the oldest note: fillers are never pulled.
        for _ in 0..6 {
            handle_key(&mut s, press(KeyCode::Char('k')), now);
        }
        assert_eq!(s.engine.pulled_key(), Some("sample-1"));
        assert_eq!(s.status_message.as_deref(), Some("No older note"));
    }

    #[test]
    fn user_scroll_while_previewing_puts_the_card_back() {
        let mut s = state();
        let start = Instant::now();
        handle_key(&mut s, press(KeyCode::Char('k')), start);
        // Let the auto-center settle and the grace period lapse.
        let mut now = start;
        for _ in 0..70 {
            now += Duration::from_millis(16);
            frame(&mut s, now);
        }
        handle_key(&mut s, press(KeyCode::Up), now);
        assert!(matches!(
            s.engine.preview_state(),
            PreviewState::Retracting { .. }
        ));
    }

    #[test]
    fn clicks_hit_the_topmost_card_and_background_taps_put_back() {
        let mut s = state();
        let now = Instant::now();
        let inner = s.engine.items().len() - 2;
        s.hit_zones = vec![
            CardHitZone {
                index: inner,
                rect: Rect::new(4, 10, 70, 20),
            },
            CardHitZone {
                index: inner + 1,
                rect: Rect::new(4, 15, 70, 20),
            },
        ];

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 12), now);
        assert_eq!(s.engine.pulled_key(), Some("sample-4"));

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), now);
        assert_eq!(s.engine.pulled_key(), None);
    }

    #[test]
    fn export_toggle_falls_back_to_the_newest_note() {
        let mut s = state();
        toggle_export(&mut s);
        assert_eq!(s.engine.export_target(), Some("sample-5"));
        assert_eq!(s.engine.items().len(), 1);
        toggle_export(&mut s);
        assert!(!s.engine.is_export_mode());
        assert_eq!(s.engine.items().len(), 12);
    }

    #[test]
    fn export_mode_bypasses_the_filter() {
        let mut s = state();
        s.set_filter(NoteFilter {
            tags: vec!["no-such-tag".into()],
            ..NoteFilter::default()
        });
        assert!(s.engine.notes().is_empty());
        assert_eq!(s.status_message.as_deref(), Some("Filtered: 0 of 5 notes"));

        s.export_id = Some("sample-2".into());
        toggle_export(&mut s);
        assert_eq!(s.engine.notes().len(), 5);
        assert_eq!(s.engine.items()[0].key(), "sample-2");

        toggle_export(&mut s);
        assert!(s.engine.notes().is_empty());
    }

    #[test]
    fn wheel_scrolls_by_the_configured_step() {
        let mut s = state();
        let before = s.viewport.scroll_top();
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollUp, 10, 10), Instant::now());
        assert_eq!(s.viewport.scroll_top(), before - 60.0);
        assert_eq!(s.engine.scroll_state().scroll_top, before - 60.0);
    }
}
