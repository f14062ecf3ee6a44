//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::note::Mood;

/// Paper tone of a fully lit card.
const PAPER: (f64, f64, f64) = (244.0, 239.0, 226.0);
/// Filler cards are blank and a shade darker.
const BLANK: (f64, f64, f64) = (214.0, 210.0, 200.0);

/// Central theme; every colour in the UI comes from here.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────

    /// Card background for a brightness/opacity factor in `[0, 1]`.
    pub fn card_bg(light: f64, filler: bool) -> Color {
        let (r, g, b) = if filler { BLANK } else { PAPER };
        let light = light.clamp(0.0, 1.0);
        Color::Rgb(
            (r * light).round() as u8,
            (g * light).round() as u8,
            (b * light).round() as u8,
        )
    }

    /// Body text on a card.
    pub fn card_text(light: f64, blurred: bool) -> Style {
        let shade = (30.0 + (1.0 - light.clamp(0.0, 1.0)) * 60.0).round() as u8;
        let style = Style::default().fg(Color::Rgb(shade, shade, shade));
        if blurred {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }

    pub fn card_title(light: f64, blurred: bool) -> Style {
        Self::card_text(light, blurred).add_modifier(Modifier::BOLD)
    }

    pub fn card_border(pulled: bool) -> Style {
        if pulled {
            Style::default()
                .fg(Color::Rgb(214, 120, 40))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(120, 114, 100))
        }
    }

    pub fn card_meta() -> Style {
        Style::default()
            .fg(Color::Rgb(110, 104, 92))
            .add_modifier(Modifier::ITALIC)
    }

    pub fn tag_style() -> Style {
        Style::default().fg(Color::Rgb(40, 96, 150))
    }

    pub fn mood_style(mood: Mood) -> Style {
        let fg = match mood {
            Mood::Happy => Color::Rgb(46, 125, 50),
            Mood::Sad => Color::Rgb(48, 63, 159),
            Mood::Focused => Color::Rgb(0, 121, 107),
            Mood::Anxious => Color::Rgb(239, 108, 0),
            Mood::Excited => Color::Rgb(173, 20, 87),
            Mood::Neutral => Color::Rgb(97, 97, 97),
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
