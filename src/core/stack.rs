//! Stack model: the ordered deck of cards built from the note list.
//!
//! Index 0 is the back of the deck (oldest); the last index is the front
//! card (newest).  Filler placeholders occupy the lowest indices so the
//! deck never looks empty.

use super::note::Note;

/// Minimum number of slots in the deck.
pub const MIN_CARDS: usize = 12;
/// Vertical spacing between stacked card tops (px).
pub const HEADER_OFFSET: f64 = 70.0;
/// Offset of the first card's top when `scroll_top == 0` (px).
pub const STACK_START: f64 = 600.0;
/// Vertical travel of a fully pulled-out card (px).
pub const PULLED_OFFSET: f64 = -480.0;
/// Nominal card height (px).
pub const CARD_HEIGHT: f64 = 500.0;
/// Distance from a card's top to its visual center (px).
pub const CARD_CENTER_OFFSET: f64 = CARD_HEIGHT / 2.0;

/// Fraction of the viewport where the front card rests when scrolled to the bottom.
const FOCUS_FRACTION: f64 = 0.4;
/// Extra scroll room below the front card (px).
const SCROLL_PADDING: f64 = 40.0;

/// One slot in the deck.
#[derive(Debug, Clone, PartialEq)]
pub enum StackItem {
    Filler { key: String },
    Note { note: Note },
}

impl StackItem {
    /// Stable identity across rebuilds.  Note items use the note id.
    pub fn key(&self) -> &str {
        match self {
            StackItem::Filler { key } => key,
            StackItem::Note { note } => &note.id,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        match self {
            StackItem::Note { note } => Some(note),
            StackItem::Filler { .. } => None,
        }
    }

    pub fn is_filler(&self) -> bool {
        matches!(self, StackItem::Filler { .. })
    }
}

pub fn filler_count(note_count: usize) -> usize {
    MIN_CARDS.saturating_sub(note_count)
}

/// Build the deck from a newest-first note list.
pub fn build_stack(notes: &[Note]) -> Vec<StackItem> {
    let fillers = filler_count(notes.len());
    let mut items = Vec::with_capacity(fillers + notes.len());
    items.extend((0..fillers).map(|i| StackItem::Filler {
        key: format!("empty-{i}"),
    }));
    items.extend(notes.iter().rev().map(|n| StackItem::Note { note: n.clone() }));
    items
}

/// Export mode: only the selected note, or the newest one when the target
/// is unknown.  Fillers are never shown.
pub fn export_selection(notes: &[Note], target: Option<&str>) -> Vec<StackItem> {
    target
        .and_then(|id| notes.iter().find(|n| n.id == id))
        .or_else(|| notes.first())
        .map(|n| vec![StackItem::Note { note: n.clone() }])
        .unwrap_or_default()
}

/// Resting top of the card at `index` in content coordinates.
pub fn natural_top(index: usize) -> f64 {
    STACK_START + index as f64 * HEADER_OFFSET
}

/// Static layout of the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackGeometry {
    pub total_items: usize,
    pub viewport_height: f64,
    pub final_item_top: f64,
    pub scroll_height: f64,
}

impl StackGeometry {
    pub fn compute(total_items: usize, viewport_height: f64) -> Self {
        let final_item_top = natural_top(total_items.saturating_sub(1));
        let focus_threshold = viewport_height * FOCUS_FRACTION;
        let ideal = final_item_top + viewport_height - focus_threshold + SCROLL_PADDING;
        Self {
            total_items,
            viewport_height,
            final_item_top,
            scroll_height: ideal.max(viewport_height),
        }
    }

    /// Export mode has no scrollable area.
    pub fn fixed(total_items: usize, viewport_height: f64) -> Self {
        Self {
            total_items,
            viewport_height,
            final_item_top: STACK_START,
            scroll_height: viewport_height,
        }
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.viewport_height).max(0.0)
    }
}
