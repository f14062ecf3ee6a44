//! The card stack, projected from engine pixels onto terminal cells.
//!
//! Each card's render parameters are treated like a CSS transform inside a
//! container with `perspective: 1000px`: the card is scaled, foreshortened
//! by its tilt and then projected toward the viewport centre.  Cards are
//! drawn in ascending z-index so the newest card overlaps the rest.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::core::engine::StackEngine;
use crate::core::simulator::CardRender;
use crate::core::stack::{StackItem, CARD_CENTER_OFFSET, CARD_HEIGHT};

use super::theme::Theme;

/// Distance from the viewer to the `z = 0` plane (px).
pub const PERSPECTIVE: f64 = 1000.0;
/// Widest a card may be drawn at scale 1 (columns).
const MAX_CARD_COLS: f64 = 72.0;
/// Blur above this many pixels renders the card text dimmed.
const BLUR_DIM_THRESHOLD: f64 = 2.0;
/// Raw progress above which a card gets the pulled-out border.
const PULLED_HIGHLIGHT: f64 = 0.5;

/// A clickable card rectangle from the last draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHitZone {
    pub index: usize,
    pub rect: Rect,
}

/// Topmost card under `(col, row)`.  `zones` is in draw order.
pub fn hit_test(zones: &[CardHitZone], col: u16, row: u16) -> Option<usize> {
    zones
        .iter()
        .rev()
        .find(|z| super::layout::point_in_rect(z.rect, col, row))
        .map(|z| z.index)
}

/// Project one card into `area`.  `None` when it is hidden or fully
/// outside the area.
pub fn project(render: &CardRender, scroll_top: f64, area: Rect, px_per_row: f64) -> Option<Rect> {
    if !render.visible || render.opacity <= 0.0 || area.width == 0 || area.height == 0 {
        return None;
    }
    let viewport_height = area.height as f64 * px_per_row;
    let origin = viewport_height / 2.0;
    let magnification = PERSPECTIVE / (PERSPECTIVE - render.translate_z).max(1.0);

    let center = render.top - scroll_top + render.translate_y + CARD_CENTER_OFFSET;
    let center = origin + (center - origin) * magnification;
    let height =
        CARD_HEIGHT * render.scale * render.tilt_deg.to_radians().cos().abs() * magnification;

    let top = center - height / 2.0;
    let bottom = center + height / 2.0;
    if bottom <= 0.0 || top >= viewport_height {
        return None;
    }
    let first_row = (top.max(0.0) / px_per_row).round();
    let end_row = (bottom.min(viewport_height) / px_per_row).round();
    if end_row <= first_row {
        return None;
    }

    let area_width = area.width as f64;
    let base = (area_width - 2.0).clamp(1.0, MAX_CARD_COLS);
    let width = (base * render.scale * magnification)
        .round()
        .clamp(1.0, area_width);
    let x = area.x as f64 + ((area_width - width) / 2.0).floor();

    Some(Rect::new(
        x as u16,
        area.y + first_row as u16,
        width as u16,
        (end_row - first_row) as u16,
    ))
}

/// Renders the deck and reports where each card landed.
pub struct StackWidget<'a> {
    engine: &'a StackEngine,
    scroll_top: f64,
    px_per_row: f64,
}

impl<'a> StackWidget<'a> {
    pub fn new(engine: &'a StackEngine, scroll_top: f64, px_per_row: f64) -> Self {
        Self {
            engine,
            scroll_top,
            px_per_row,
        }
    }

    /// Render and return hit zones for mouse interaction, in draw order.
    pub fn render_and_hit(self, area: Rect, buf: &mut Buffer) -> Vec<CardHitZone> {
        if self.engine.is_export_mode() {
            return self.render_export(area, buf);
        }

        let mut zones = Vec::new();
        for (index, item) in self.engine.items().iter().enumerate() {
            let Some(render) = self.engine.render(item.key()) else {
                continue;
            };
            let Some(rect) = project(render, self.scroll_top, area, self.px_per_row) else {
                continue;
            };
            let look = CardLook {
                light: render.brightness * render.opacity,
                blurred: render.blur > BLUR_DIM_THRESHOLD,
                pulled: render.progress > PULLED_HIGHLIGHT,
            };
            draw_card(item, look, rect, buf);
            zones.push(CardHitZone { index, rect });
        }
        zones
    }

    /// Export mode: the selected note alone, flat and centred.
    fn render_export(self, area: Rect, buf: &mut Buffer) -> Vec<CardHitZone> {
        let rows = (CARD_HEIGHT / self.px_per_row).round() as u16;
        let width = (area.width.saturating_sub(2)).min(MAX_CARD_COLS as u16);
        let rect = centered_fixed(width, rows, area);
        let look = CardLook {
            light: 1.0,
            blurred: false,
            pulled: false,
        };
        self.engine
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                draw_card(item, look, rect, buf);
                CardHitZone { index, rect }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct CardLook {
    light: f64,
    blurred: bool,
    pulled: bool,
}

fn draw_card(item: &StackItem, look: CardLook, rect: Rect, buf: &mut Buffer) {
    Clear.render(rect, buf);

    let bg = Theme::card_bg(look.light, item.is_filler());
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::card_border(look.pulled).bg(bg))
        .style(Style::default().bg(bg));

    let Some(note) = item.note() else {
        block.render(rect, buf);
        return;
    };

    block = block.title(Span::styled(
        format!(" {} ", note.title()),
        Theme::card_title(look.light, look.blurred),
    ));
    if let Some(created) = note.created_local() {
        block = block.title(
            Line::from(Span::styled(
                format!(" {} ", created.format("%b %e, %H:%M")),
                Theme::card_meta(),
            ))
            .right_aligned(),
        );
    }

    let inner = block.inner(rect);
    block.render(rect, buf);

    let mut meta = Vec::new();
    if let Some(analysis) = &note.analysis {
        meta.push(Span::styled(
            analysis.mood.label(),
            Theme::mood_style(analysis.mood),
        ));
    }
    for tag in note.tags() {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(format!("#{tag}"), Theme::tag_style()));
    }

    let text_style = Theme::card_text(look.light, look.blurred);
    let mut lines = Vec::new();
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }
    lines.extend(
        note.content
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), text_style))),
    );

    Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::core::engine::EngineConfig;
    use crate::core::note::sample_notes;
    use crate::core::stack::natural_top;

    const PX: f64 = 16.0;

    fn area() -> Rect {
        Rect::new(0, 0, 80, 50)
    }

    fn resting(index: usize, translate_z: f64, scale: f64) -> CardRender {
        CardRender {
            top: natural_top(index),
            translate_z,
            scale,
            brightness: 1.0,
            opacity: 1.0,
            visible: true,
            z_index: index,
            ..CardRender::default()
        }
    }

    #[test]
    fn hidden_cards_are_not_projected() {
        let mut r = resting(0, 0.0, 1.0);
        r.visible = false;
        assert_eq!(project(&r, 0.0, area(), PX), None);
    }

    #[test]
    fn cards_scrolled_far_above_the_view_are_dropped() {
        let r = resting(0, 0.0, 1.0);
        assert_eq!(project(&r, 5000.0, area(), PX), None);
    }

    #[test]
    fn flat_card_maps_pixels_to_rows() {
        // z = 0 and no tilt: 500px from y = 0 is rows 0..31 (rounded).
        let mut r = resting(0, 0.0, 1.0);
        r.top = 0.0;
        let rect = project(&r, 0.0, area(), PX).unwrap();
        assert_eq!(rect.y, 0);
        assert_eq!(rect.height, 31);
        assert_eq!(rect.width, 72);
        assert_eq!(rect.x, 4);
    }

    #[test]
    fn deep_cards_are_smaller_than_near_ones() {
        let near = project(&resting(0, 100.0, 1.0), 200.0, area(), PX).unwrap();
        let far = project(&resting(0, -900.0, 0.85), 200.0, area(), PX).unwrap();
        assert!(far.width < near.width);
        assert!(far.height < near.height);
    }

    #[test]
    fn projection_stays_inside_the_area() {
        let a = Rect::new(3, 2, 60, 20);
        for scroll in [0.0, 300.0, 600.0, 900.0] {
            for index in 0..12 {
                if let Some(rect) = project(&resting(index, 100.0, 1.0), scroll, a, PX) {
                    assert!(rect.x >= a.x && rect.right() <= a.right());
                    assert!(rect.y >= a.y && rect.bottom() <= a.bottom());
                }
            }
        }
    }

    #[test]
    fn hit_test_prefers_the_topmost_zone() {
        let zones = [
            CardHitZone {
                index: 3,
                rect: Rect::new(0, 0, 10, 10),
            },
            CardHitZone {
                index: 4,
                rect: Rect::new(0, 5, 10, 10),
            },
        ];
        assert_eq!(hit_test(&zones, 1, 2), Some(3));
        assert_eq!(hit_test(&zones, 1, 7), Some(4));
        assert_eq!(hit_test(&zones, 20, 7), None);
    }

    #[test]
    fn rendering_draws_the_front_card_last() {
        let mut engine = StackEngine::new(EngineConfig::default());
        engine.set_viewport_height(area().height as f64 * PX);
        engine.set_notes(sample_notes(0));
        let bottom = engine.geometry().max_scroll();
        engine.reset_scroll(bottom);
        engine.tick(Duration::from_millis(16), Instant::now());

        let mut buf = Buffer::empty(area());
        let zones = StackWidget::new(&engine, bottom, PX).render_and_hit(area(), &mut buf);

        assert!(!zones.is_empty());
        let front = engine.items().len() - 1;
        assert_eq!(zones.last().map(|z| z.index), Some(front));

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("How to use the stack"));
    }

    #[test]
    fn export_mode_draws_one_flat_card() {
        let mut engine = StackEngine::new(EngineConfig::default());
        engine.set_viewport_height(area().height as f64 * PX);
        engine.set_notes(sample_notes(0));
        engine.set_export_target(Some("sample-3".into()));

        let mut buf = Buffer::empty(area());
        let zones = StackWidget::new(&engine, 0.0, PX).render_and_hit(area(), &mut buf);
        assert_eq!(zones.len(), 1);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Quiet rainy day"));
    }
}
