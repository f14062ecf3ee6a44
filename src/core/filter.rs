//! Note filter applied before the list reaches the stack.
//!
//! Tags match in ANY or ALL mode.  Day bounds are inclusive and taken in
//! local time: `since` from 00:00:00.000, `until` to 23:59:59.999.

use chrono::{Local, NaiveDate, TimeZone};

use super::note::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMode {
    /// A note needs at least one of the selected tags.
    #[default]
    Any,
    /// A note needs every selected tag.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteFilter {
    pub tags: Vec<String>,
    pub tag_mode: TagMode,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl NoteFilter {
    pub fn is_active(&self) -> bool {
        !self.tags.is_empty() || self.since.is_some() || self.until.is_some()
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let Some(start) = self.since.and_then(day_start_ms) {
            if note.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.until.and_then(day_end_ms) {
            if note.created_at > end {
                return false;
            }
        }
        if self.tags.is_empty() {
            return true;
        }
        let note_tags = note.tags();
        match self.tag_mode {
            TagMode::All => self.tags.iter().all(|t| note_tags.contains(t)),
            TagMode::Any => self.tags.iter().any(|t| note_tags.contains(t)),
        }
    }

    /// Notes that pass, in their original order.
    pub fn apply(&self, notes: &[Note]) -> Vec<Note> {
        notes.iter().filter(|n| self.matches(n)).cloned().collect()
    }
}

/// First millisecond of `date` in local time.
pub fn day_start_ms(date: NaiveDate) -> Option<i64> {
    let start = date.and_hms_milli_opt(0, 0, 0, 0)?;
    Local
        .from_local_datetime(&start)
        .earliest()
        .map(|t| t.timestamp_millis())
}

/// Last millisecond of `date` in local time.
pub fn day_end_ms(date: NaiveDate) -> Option<i64> {
    let end = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Local
        .from_local_datetime(&end)
        .latest()
        .map(|t| t.timestamp_millis())
}
