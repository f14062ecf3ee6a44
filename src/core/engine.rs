//! The stack engine: one explicit simulation context owned by the host.
//!
//! The host feeds it notes, the viewport height, scroll events, clicks and
//! frame ticks; the engine answers with render parameters per mounted card
//! and a queue of [`EngineEvent`]s.  Time always comes in from the caller.

use std::time::{Duration, Instant};

use super::element::ElementRegistry;
use super::note::Note;
use super::preview::{ClickOutcome, PreviewMachine, PreviewState};
use super::progress::CardProgress;
use super::scroll::{ScrollState, ScrollTracker, ScrollViewport};
use super::simulator::{CardRender, FrameSimulator, InputProfile};
use super::stack::{build_stack, export_selection, StackGeometry, StackItem};

/// Outbound notifications for the host's collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Open the detail view for this note.
    CardActivated(Note),
    PulledOut(String),
    PutBack(String),
    /// Scroll travelled far enough for one sound/haptic tick.
    FeedbackTick,
    /// Short click accompanying a pull-out.
    ClickSound,
}

/// Which neighbour to pull out next when navigating by keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Older,
    Newer,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub profile: InputProfile,
}

pub struct StackEngine {
    simulator: FrameSimulator,
    notes: Vec<Note>,
    items: Vec<StackItem>,
    export_target: Option<String>,
    viewport_height: f64,
    geometry: StackGeometry,
    scroll: ScrollTracker,
    progress: CardProgress,
    preview: PreviewMachine,
    elements: ElementRegistry,
    events: Vec<EngineEvent>,
}

impl StackEngine {
    pub fn new(config: EngineConfig) -> Self {
        let items = build_stack(&[]);
        let geometry = StackGeometry::compute(items.len(), 0.0);
        let mut elements = ElementRegistry::new();
        elements.sync(&items);
        Self {
            simulator: FrameSimulator::new(config.profile),
            notes: Vec::new(),
            items,
            export_target: None,
            viewport_height: 0.0,
            geometry,
            scroll: ScrollTracker::new(),
            progress: CardProgress::new(),
            preview: PreviewMachine::new(),
            elements,
            events: Vec::new(),
        }
    }

    // ── inputs ──────────────────────────────────────────────────

    /// Replace the note list (newest-first) and rebuild the deck.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.rebuild();
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.recompute_geometry();
    }

    /// Enter (`Some`) or leave (`None`) export mode.
    pub fn set_export_target(&mut self, target: Option<String>) {
        self.export_target = target;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.items = match &self.export_target {
            Some(id) => export_selection(&self.notes, Some(id)),
            None => build_stack(&self.notes),
        };
        let (mounted, unmounted) = self.elements.sync(&self.items);
        self.recompute_geometry();
        tracing::debug!(
            items = self.items.len(),
            mounted,
            unmounted,
            export = self.export_target.is_some(),
            "stack rebuilt"
        );
    }

    fn recompute_geometry(&mut self) {
        self.geometry = if self.is_export_mode() {
            StackGeometry::fixed(self.items.len(), self.viewport_height)
        } else {
            StackGeometry::compute(self.items.len(), self.viewport_height)
        };
    }

    /// A native scroll event: the viewport has moved.
    pub fn on_scroll(&mut self, viewport: &dyn ScrollViewport, now: Instant) {
        if self.is_export_mode() {
            return;
        }
        let sample = self
            .scroll
            .on_scroll(viewport.scroll_top(), self.preview.is_previewing(), now);
        tracing::trace!(delta = sample.delta, "scroll");
        if sample.dismiss {
            self.put_back(now);
        }
        if sample.feedback {
            self.events.push(EngineEvent::FeedbackTick);
        }
    }

    /// Place the scroll position without velocity or feedback.
    pub fn reset_scroll(&mut self, scroll_top: f64) {
        self.scroll.reset_to(scroll_top);
    }

    /// Click on the card at `index`.
    pub fn click_item(
        &mut self,
        index: usize,
        viewport: &mut dyn ScrollViewport,
        now: Instant,
    ) -> ClickOutcome {
        let Some(item) = self.items.get(index) else {
            return ClickOutcome::Ignored;
        };
        let is_front = index + 1 == self.items.len();
        let outcome = self.preview.click(item, is_front);

        match &outcome {
            ClickOutcome::Ignored => {}
            ClickOutcome::Activate | ClickOutcome::Confirm => {
                if let Some(note) = item.note() {
                    self.events.push(EngineEvent::CardActivated(note.clone()));
                }
            }
            ClickOutcome::PullOut { key, .. } => {
                self.events.push(EngineEvent::ClickSound);
                self.events.push(EngineEvent::PulledOut(key.clone()));
                if !self.is_export_mode() {
                    let target =
                        self.scroll
                            .auto_center(index, self.viewport_height, viewport, now);
                    tracing::debug!(index, target, "auto-centering pulled card");
                }
            }
        }
        outcome
    }

    /// Pull out the nearest note card older or newer than the current
    /// preview (or than the front card when nothing is pulled out).
    pub fn pull_neighbor(
        &mut self,
        direction: Neighbor,
        viewport: &mut dyn ScrollViewport,
        now: Instant,
    ) -> Option<ClickOutcome> {
        let anchor = self
            .preview
            .pulled_key()
            .and_then(|k| self.index_of(k))
            .unwrap_or(self.items.len().saturating_sub(1));

        let is_note = |i: &usize| !self.items[*i].is_filler();
        let target = match direction {
            Neighbor::Older => (0..anchor).rev().find(is_note),
            Neighbor::Newer => (anchor + 1..self.items.len()).find(is_note),
        }?;
        Some(self.click_item(target, viewport, now))
    }

    /// Explicit put-back of the previewed card.
    pub fn put_back(&mut self, now: Instant) {
        if let Some(key) = self.preview.dismiss(now) {
            self.events.push(EngineEvent::PutBack(key));
        }
    }

    /// A tap outside every card.
    pub fn background_tap(&mut self, now: Instant) {
        self.put_back(now);
    }

    // ── frame ───────────────────────────────────────────────────

    /// Advance one frame.  Returns the number of visible cards.
    pub fn tick(&mut self, dt: Duration, now: Instant) -> usize {
        if let Some(key) = self.preview.tick(now) {
            tracing::debug!(key = %key, "retracted card released");
        }
        if self.is_export_mode() {
            return 0;
        }

        // Read once; velocity decays only after every card has seen it.
        let scroll = self.scroll.state();
        let visible = self.simulator.run(
            &self.items,
            self.preview.pulled_key(),
            scroll,
            self.viewport_height,
            dt.as_secs_f64(),
            &mut self.progress,
            &mut self.elements,
        );
        self.scroll.decay();
        tracing::trace!(visible, scroll_top = scroll.scroll_top, "frame");
        visible
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ── queries ─────────────────────────────────────────────────

    pub fn items(&self) -> &[StackItem] {
        &self.items
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|i| i.key() == key)
    }

    pub fn geometry(&self) -> StackGeometry {
        self.geometry
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn preview_state(&self) -> &PreviewState {
        self.preview.state()
    }

    pub fn pulled_key(&self) -> Option<&str> {
        self.preview.pulled_key()
    }

    pub fn progress(&self, key: &str) -> f64 {
        self.progress.get(key)
    }

    /// Last render parameters for a mounted card.
    pub fn render(&self, key: &str) -> Option<&CardRender> {
        self.elements.get(key).and_then(|e| e.render.as_ref())
    }

    pub fn is_export_mode(&self) -> bool {
        self.export_target.is_some()
    }

    pub fn export_target(&self) -> Option<&str> {
        self.export_target.as_deref()
    }
}
