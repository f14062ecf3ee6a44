//! Preview state machine: which single card, if any, is pulled out.
//!
//! Only `Previewing(key)` gives a card a pulled-out target.  `Retracting`
//! keeps the dismissed key around long enough for its progress to ramp back
//! to zero before the host releases it.

use std::time::{Duration, Instant};

use super::stack::StackItem;

/// How long a dismissed card stays in `Retracting`.  Longer than the
/// ~600ms visual retract.
pub const RETRACT_HOLD: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Previewing(String),
    Retracting { key: String, until: Instant },
}

/// Result of clicking a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Filler or unknown item.
    Ignored,
    /// Front card clicked with nothing previewed: open it directly.
    Activate,
    /// The previewed card was clicked again: open it and go idle.
    Confirm,
    /// The card became the preview target.  `replaced` is the previous
    /// target, which now ramps back on its own.
    PullOut { key: String, replaced: Option<String> },
}

#[derive(Debug, Default)]
pub struct PreviewMachine {
    state: PreviewState,
}

impl PreviewMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// The one key whose target progress is 1.
    pub fn pulled_key(&self) -> Option<&str> {
        match &self.state {
            PreviewState::Previewing(key) => Some(key),
            _ => None,
        }
    }

    pub fn retracting_key(&self) -> Option<&str> {
        match &self.state {
            PreviewState::Retracting { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.state, PreviewState::Previewing(_))
    }

    pub fn click(&mut self, item: &StackItem, is_front: bool) -> ClickOutcome {
        let StackItem::Note { note } = item else {
            return ClickOutcome::Ignored;
        };

        let previewed = self.pulled_key().map(str::to_owned);
        if previewed.as_deref() == Some(note.id.as_str()) {
            tracing::debug!(key = %note.id, "preview confirmed");
            self.state = PreviewState::Idle;
            return ClickOutcome::Confirm;
        }
        if previewed.is_none() && is_front {
            return ClickOutcome::Activate;
        }

        tracing::debug!(key = %note.id, replaced = ?previewed, "card pulled out");
        self.state = PreviewState::Previewing(note.id.clone());
        ClickOutcome::PullOut {
            key: note.id.clone(),
            replaced: previewed,
        }
    }

    /// Put back the previewed card.  Returns its key, or `None` when nothing
    /// was previewed.
    pub fn dismiss(&mut self, now: Instant) -> Option<String> {
        let PreviewState::Previewing(key) = &self.state else {
            return None;
        };
        let key = key.clone();
        tracing::debug!(key = %key, "preview dismissed");
        self.state = PreviewState::Retracting {
            key: key.clone(),
            until: now + RETRACT_HOLD,
        };
        Some(key)
    }

    /// Release an expired retract hold.  Returns the released key.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let expired = match &self.state {
            PreviewState::Retracting { key, until } if now >= *until => key.clone(),
            _ => return None,
        };
        self.state = PreviewState::Idle;
        Some(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::Note;

    fn note(id: &str) -> StackItem {
        StackItem::Note {
            note: Note::new(id, "", 0),
        }
    }

    fn filler() -> StackItem {
        StackItem::Filler {
            key: "empty-0".into(),
        }
    }

    #[test]
    fn filler_clicks_are_ignored() {
        let mut m = PreviewMachine::new();
        assert_eq!(m.click(&filler(), false), ClickOutcome::Ignored);
        assert_eq!(m.state(), &PreviewState::Idle);
    }

    #[test]
    fn front_card_opens_directly_when_idle() {
        let mut m = PreviewMachine::new();
        assert_eq!(m.click(&note("a"), true), ClickOutcome::Activate);
        assert_eq!(m.state(), &PreviewState::Idle);
    }

    #[test]
    fn inner_card_pulls_out_then_confirms() {
        let mut m = PreviewMachine::new();
        assert_eq!(
            m.click(&note("a"), false),
            ClickOutcome::PullOut {
                key: "a".into(),
                replaced: None
            }
        );
        assert_eq!(m.pulled_key(), Some("a"));
        assert_eq!(m.click(&note("a"), false), ClickOutcome::Confirm);
        assert_eq!(m.state(), &PreviewState::Idle);
    }

    #[test]
    fn clicking_another_card_retargets() {
        let mut m = PreviewMachine::new();
        m.click(&note("a"), false);
        assert_eq!(
            m.click(&note("b"), false),
            ClickOutcome::PullOut {
                key: "b".into(),
                replaced: Some("a".into())
            }
        );
        assert_eq!(m.pulled_key(), Some("b"));
    }

    #[test]
    fn front_card_is_pulled_out_while_another_is_previewed() {
        let mut m = PreviewMachine::new();
        m.click(&note("a"), false);
        assert!(matches!(
            m.click(&note("front"), true),
            ClickOutcome::PullOut { .. }
        ));
    }

    #[test]
    fn dismiss_retracts_for_the_hold_then_idles() {
        let mut m = PreviewMachine::new();
        let now = Instant::now();
        assert_eq!(m.dismiss(now), None);
        m.click(&note("a"), false);
        assert_eq!(m.dismiss(now), Some("a".into()));
        assert_eq!(m.pulled_key(), None);
        assert_eq!(m.retracting_key(), Some("a"));
        assert_eq!(m.dismiss(now), None);

        assert_eq!(m.tick(now + Duration::from_millis(699)), None);
        assert_eq!(m.tick(now + RETRACT_HOLD), Some("a".into()));
        assert_eq!(m.state(), &PreviewState::Idle);
    }

    #[test]
    fn at_most_one_pulled_key_through_any_sequence() {
        let mut m = PreviewMachine::new();
        let start = Instant::now();
        let ids = ["a", "b", "c", "a", "b"];
        for (i, id) in ids.iter().cycle().take(40).enumerate() {
            let now = start + Duration::from_millis(i as u64 * 150);
            match i % 4 {
                0 | 1 => {
                    m.click(&note(id), i % 5 == 0);
                }
                2 => {
                    m.dismiss(now);
                }
                _ => {
                    m.tick(now);
                }
            }
            let pulled = m.pulled_key().into_iter().count();
            assert!(pulled <= 1);
            if m.retracting_key().is_some() {
                assert!(m.pulled_key().is_none());
            }
        }
    }
}
