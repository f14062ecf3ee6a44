//! Note records and the JSON loader that feeds the stack.
//!
//! The loader accepts the same array-of-notes shape the export format uses.
//! Entries without a string `id`, string `content` and numeric `createdAt`
//! are dropped; duplicate ids collapse with the later entry winning.  The
//! result is always ordered newest-first, which is what the stack model
//! expects as input.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Stable note identifier (also the stack item key).
pub type NoteId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Sad,
    Focused,
    Excited,
    Anxious,
}

impl Mood {
    pub fn label(self) -> &'static str {
        match self {
            Mood::Neutral => "NEUTRAL",
            Mood::Happy => "HAPPY",
            Mood::Sad => "SAD",
            Mood::Focused => "FOCUSED",
            Mood::Excited => "EXCITED",
            Mood::Anxious => "ANXIOUS",
        }
    }
}

/// Summary data attached to a note by an external analyser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_at,
            analysis: None,
        }
    }

    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Creation time in the local timezone, if the timestamp is representable.
    pub fn created_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.created_at).single()
    }

    /// One-line title: the analysis summary, or the first content line.
    pub fn title(&self) -> &str {
        match &self.analysis {
            Some(a) if !a.summary.is_empty() => &a.summary,
            _ => self.content.lines().next().unwrap_or(""),
        }
    }

    pub fn tags(&self) -> &[String] {
        self.analysis.as_ref().map_or(&[], |a| a.tags.as_slice())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NoteLoadError {
    #[error("reading notes file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing notes file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid structure: root must be an array")]
    NotAnArray,
    #[error("no valid notes found in {0} entries")]
    NoValidNotes(usize),
}

/// Load notes from a JSON file, newest-first.
pub fn load_notes(path: &Path) -> Result<Vec<Note>, NoteLoadError> {
    let data = std::fs::read_to_string(path)?;
    parse_notes(&data)
}

/// Parse a JSON array of notes, dropping malformed entries.
pub fn parse_notes(data: &str) -> Result<Vec<Note>, NoteLoadError> {
    let root: serde_json::Value = serde_json::from_str(data)?;
    let serde_json::Value::Array(entries) = root else {
        return Err(NoteLoadError::NotAnArray);
    };

    let total = entries.len();
    let mut by_id: HashMap<NoteId, Note> = HashMap::with_capacity(total);
    for entry in entries {
        if !has_required_fields(&entry) {
            tracing::warn!("skipping note entry without id/content/createdAt");
            continue;
        }
        match serde_json::from_value::<Note>(entry) {
            Ok(note) => {
                by_id.insert(note.id.clone(), note);
            }
            Err(e) => tracing::warn!("skipping malformed note entry: {e}"),
        }
    }

    if by_id.is_empty() && total > 0 {
        return Err(NoteLoadError::NoValidNotes(total));
    }

    let mut notes: Vec<Note> = by_id.into_values().collect();
    sort_newest_first(&mut notes);
    Ok(notes)
}

fn has_required_fields(entry: &serde_json::Value) -> bool {
    entry.get("id").is_some_and(|v| v.is_string())
        && entry.get("content").is_some_and(|v| v.is_string())
        && entry.get("createdAt").is_some_and(|v| v.is_number())
}

/// Newest first; ties broken by id so the order is deterministic.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// A handful of notes shown when no file is given on the command line.
pub fn sample_notes(now_ms: i64) -> Vec<Note> {
    const HOUR: i64 = 60 * 60 * 1000;
    let entries: [(&str, &str, &str, &[&str], Mood, i64); 5] = [
        (
            "sample-5",
            "Scroll up to flip back through older cards.\nClick a card in the stack to pull it out; click it again to open it.",
            "How to use the stack",
            &["help"],
            Mood::Focused,
            0,
        ),
        (
            "sample-4",
            "Finished the retract timing: 700ms keeps the card mounted past the 600ms ease.",
            "Retract timing done",
            &["work", "animation"],
            Mood::Happy,
            3 * HOUR,
        ),
        (
            "sample-3",
            "Rain all afternoon. Read two chapters and made soup.",
            "Quiet rainy day",
            &["life"],
            Mood::Neutral,
            26 * HOUR,
        ),
        (
            "sample-2",
            "Deadline moved up a week. Need to cut scope on the export view.",
            "Deadline moved",
            &["work"],
            Mood::Anxious,
            50 * HOUR,
        ),
        (
            "sample-1",
            "First entry. Trying out the deck.",
            "First entry",
            &["life"],
            Mood::Excited,
            98 * HOUR,
        ),
    ];

    entries
        .iter()
        .map(|(id, content, summary, tags, mood, age)| {
            Note::new(*id, *content, now_ms - age).with_analysis(Analysis {
                summary: (*summary).to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                mood: *mood,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_invalid_and_sorts_newest_first() {
        let json = r#"[
            {"id": "a", "content": "old", "createdAt": 100},
            {"id": "b", "content": "new", "createdAt": 300,
             "analysis": {"summary": "S", "tags": ["x"], "mood": "HAPPY"}},
            {"id": 7, "content": "bad id", "createdAt": 200},
            {"id": "c", "createdAt": 250}
        ]"#;
        let notes = parse_notes(json).unwrap();
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(notes[0].title(), "S");
        assert_eq!(notes[0].tags(), ["x".to_string()]);
        assert_eq!(notes[0].analysis.as_ref().unwrap().mood, Mood::Happy);
    }

    #[test]
    fn duplicate_ids_keep_the_later_entry() {
        let json = r#"[
            {"id": "a", "content": "first", "createdAt": 1},
            {"id": "a", "content": "second", "createdAt": 2}
        ]"#;
        let notes = parse_notes(json).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "second");
    }

    #[test]
    fn non_array_root_is_rejected() {
        assert!(matches!(
            parse_notes(r#"{"id": "a"}"#),
            Err(NoteLoadError::NotAnArray)
        ));
    }

    #[test]
    fn all_invalid_entries_is_an_error() {
        assert!(matches!(
            parse_notes(r#"[{"foo": 1}, {"bar": 2}]"#),
            Err(NoteLoadError::NoValidNotes(2))
        ));
        assert!(parse_notes("[]").unwrap().is_empty());
    }

    #[test]
    fn title_falls_back_to_first_content_line() {
        let note = Note::new("x", "line one\nline two", 0);
        assert_eq!(note.title(), "line one");
        assert!(note.tags().is_empty());
    }

    #[test]
    fn sample_notes_are_newest_first() {
        let notes = sample_notes(1_000_000_000_000);
        assert!(notes.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
