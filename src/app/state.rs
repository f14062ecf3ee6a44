//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::engine::{EngineConfig, StackEngine};
use crate::core::filter::NoteFilter;
use crate::core::note::Note;
use crate::ui::stack_widget::CardHitZone;

use super::feedback::Feedback;
use super::viewport::TerminalViewport;

/// Fraction of the remaining distance an animated scroll covers per 16 ms.
const SCROLL_EASE: f64 = 0.2;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Stack,
    Detail,
}

/// Top-level application state.
pub struct AppState {
    pub engine: StackEngine,
    /// Every loaded note, newest-first, before filtering.
    pub all_notes: Vec<Note>,
    /// Applied to `all_notes` outside export mode.
    pub filter: NoteFilter,
    /// Scroll position of the stack pane.
    pub viewport: TerminalViewport,
    pub config: AppConfig,
    pub feedback: Feedback,
    /// Note shown in the detail overlay.
    pub detail: Option<Note>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Card rectangles from the last draw, lowest z first.
    pub hit_zones: Vec<CardHitZone>,
    /// Full terminal area from the last draw.
    pub terminal_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Note id used when export mode is toggled on.
    pub export_id: Option<String>,
    /// `(item count, viewport height px)` at the last layout pass.
    pub last_layout: Option<(usize, f64)>,
}

impl AppState {
    pub fn new(notes: Vec<Note>, config: AppConfig) -> Self {
        let mut engine = StackEngine::new(EngineConfig {
            profile: config.input_profile,
        });
        engine.set_notes(notes.clone());
        let feedback = Feedback::new(config.sound_enabled, config.haptic_enabled);
        Self {
            engine,
            all_notes: notes,
            filter: NoteFilter::default(),
            viewport: TerminalViewport::new(SCROLL_EASE),
            config,
            feedback,
            detail: None,
            active_view: ActiveView::default(),
            hit_zones: Vec::new(),
            terminal_area: Rect::default(),
            should_quit: false,
            status_message: None,
            export_id: None,
            last_layout: None,
        }
    }

    pub fn set_filter(&mut self, filter: NoteFilter) {
        self.filter = filter;
        self.refresh_notes();
        if self.filter.is_active() {
            self.status_message = Some(format!(
                "Filtered: {} of {} notes",
                self.engine.notes().len(),
                self.all_notes.len()
            ));
        }
    }

    /// Push the visible note list to the engine.  Export mode bypasses the
    /// filter so the target note is never hidden.
    pub fn refresh_notes(&mut self) {
        let notes = if self.engine.is_export_mode() {
            self.all_notes.clone()
        } else {
            self.filter.apply(&self.all_notes)
        };
        tracing::debug!(
            shown = notes.len(),
            total = self.all_notes.len(),
            "notes filtered"
        );
        self.engine.set_notes(notes);
    }

    pub fn open_detail(&mut self, note: Note) {
        tracing::info!(id = %note.id, "opening note");
        self.detail = Some(note);
        self.active_view = ActiveView::Detail;
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.active_view = ActiveView::Stack;
    }
}
