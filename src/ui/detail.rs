//! Detail overlay for an opened note.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::core::note::Note;

use super::stack_widget::centered_fixed;
use super::theme::Theme;

const MAX_WIDTH: u16 = 76;
const MAX_HEIGHT: u16 = 30;

/// Where the overlay sits for a given terminal area.
pub fn overlay_area(area: Rect) -> Rect {
    centered_fixed(
        MAX_WIDTH.min(area.width.saturating_sub(4)),
        MAX_HEIGHT.min(area.height.saturating_sub(2)),
        area,
    )
}

pub struct DetailPopup<'a> {
    pub note: &'a Note,
}

impl<'a> Widget for DetailPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = overlay_area(area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.note.title()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        let when = self
            .note
            .created_local()
            .map(|t| t.format("%A, %B %e %Y, %H:%M").to_string())
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(when, Theme::hint_style())));

        if let Some(analysis) = &self.note.analysis {
            let mut meta = vec![Span::styled(
                analysis.mood.label(),
                Theme::mood_style(analysis.mood),
            )];
            for tag in &analysis.tags {
                meta.push(Span::raw("  "));
                meta.push(Span::styled(format!("#{tag}"), Theme::tag_style()));
            }
            lines.push(Line::from(meta));
        }

        lines.push(Line::raw(""));
        lines.extend(self.note.content.lines().map(|l| Line::raw(l.to_string())));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Esc/Enter: close",
            Theme::hint_style(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::{Analysis, Mood};

    #[test]
    fn overlay_is_centred_and_clamped() {
        let big = overlay_area(Rect::new(0, 0, 200, 60));
        assert_eq!((big.width, big.height), (MAX_WIDTH, MAX_HEIGHT));
        assert_eq!(big.x, (200 - MAX_WIDTH) / 2);

        let small = overlay_area(Rect::new(0, 0, 30, 10));
        assert_eq!((small.width, small.height), (26, 8));
    }

    #[test]
    fn renders_title_tags_and_body() {
        let note = Note::new("a", "line one\nline two", 0).with_analysis(Analysis {
            summary: "Hello".into(),
            tags: vec!["x".into()],
            mood: Mood::Happy,
        });
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DetailPopup { note: &note }.render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Hello"));
        assert!(text.contains("#x"));
        assert!(text.contains("line two"));
    }
}
