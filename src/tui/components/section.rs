//! # Section Panel Component
//!
//! Renders one section: heading, body, an optional carousel card, the row
//! of reveal items and the section's jump buttons.
//!
//! A transient component (created each frame) wrapping the section's
//! persistent `SectionView`. Rendering a scrollable body measures it, which
//! is what the gate later reads as the nested region's scroll metrics.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};
use unicode_width::UnicodeWidthStr;

use crate::core::deck::SectionSpec;
use crate::nav::carousel::CarouselState;
use crate::tui::component::Component;
use crate::tui::view::SectionView;

const HEADING_ROWS: u16 = 2;
const REVEAL_ROWS: u16 = 3;
const CARD_ROWS: u16 = 7;
const JUMP_ROWS: u16 = 1;
const JUMP_GAP: u16 = 2;

pub struct SectionPanel<'a> {
    spec: &'a SectionSpec,
    view: &'a mut SectionView,
    carousel: Option<CarouselState>,
}

impl<'a> SectionPanel<'a> {
    pub fn new(spec: &'a SectionSpec, view: &'a mut SectionView) -> Self {
        Self {
            spec,
            view,
            carousel: None,
        }
    }

    /// Position of this section's carousel, if it hosts one.
    pub fn with_carousel(mut self, carousel: Option<CarouselState>) -> Self {
        self.carousel = carousel.filter(|_| !self.spec.carousel.is_empty());
        self
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        if !self.view.is_scrollable() {
            let body = Paragraph::new(self.spec.body.as_str()).wrap(Wrap { trim: false });
            frame.render_widget(body, area);
            return;
        }

        let content_width = area.width.saturating_sub(1);
        let body = Paragraph::new(self.spec.body.as_str()).wrap(Wrap { trim: false });
        let content_rows = body.line_count(content_width) as u16;
        self.view.measure(area.height, content_rows);

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_rows))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(body, Rect::new(0, 0, content_width, content_rows));

        let mut state = ScrollViewState::default();
        state.set_offset(Position {
            x: 0,
            y: self.view.scroll_top,
        });
        frame.render_stateful_widget(scroll_view, area, &mut state);
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, carousel: CarouselState) {
        let Some(card) = self.spec.carousel.get(carousel.current_index) else {
            return;
        };
        let dots: String = (0..carousel.total)
            .map(|i| if i == carousel.current_index { '●' } else { '○' })
            .collect();
        let block = Block::bordered()
            .title(format!(" {}/{} ", carousel.current_index + 1, carousel.total))
            .title_bottom(Line::from(dots).centered())
            .border_style(Style::default().fg(Color::Magenta));
        frame.render_widget(
            Paragraph::new(card.as_str())
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }

    fn render_reveals(&self, frame: &mut Frame, area: Rect) {
        let count = self.spec.reveal.len() as u32;
        let slots = Layout::horizontal((0..count).map(|_| Constraint::Ratio(1, count))).split(area);
        for ((item, revealed), slot) in self
            .spec
            .reveal
            .iter()
            .zip(&self.view.revealed)
            .zip(slots.iter())
        {
            if !revealed {
                continue;
            }
            let card = Paragraph::new(item.as_str())
                .centered()
                .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
            frame.render_widget(card, *slot);
        }
    }

    /// Draws "[ label → ]" buttons left to right and records where they landed.
    fn render_jumps(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED);
        let spec = self.spec;
        let mut x = area.x;
        for jump in &spec.jumps {
            let text = format!(" {} → ", jump.label);
            let width = (UnicodeWidthStr::width(text.as_str()) as u16).min(area.right().saturating_sub(x));
            if width == 0 {
                break;
            }
            let button = Rect::new(x, area.y, width, 1);
            frame.render_widget(Paragraph::new(Span::styled(text, style)), button);
            self.view.jump_hits.push((button, jump.to));
            x = x.saturating_add(width + JUMP_GAP);
        }
    }
}

impl Component for SectionPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};

        let card_rows = if self.carousel.is_some() { CARD_ROWS } else { 0 };
        let reveal_rows = if self.spec.reveal.is_empty() { 0 } else { REVEAL_ROWS };
        let jump_rows = if self.spec.jumps.is_empty() { 0 } else { JUMP_ROWS };
        let [heading_area, body_area, card_area, reveal_area, jump_area] = Layout::vertical([
            Length(HEADING_ROWS),
            Min(1),
            Length(card_rows),
            Length(reveal_rows),
            Length(jump_rows),
        ])
        .areas(area);

        let heading = Line::from(Span::styled(
            self.spec.heading.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(heading), heading_area);

        self.render_body(frame, body_area);
        if let Some(carousel) = self.carousel {
            self.render_card(frame, card_area, carousel);
        }
        if reveal_rows > 0 {
            self.render_reveals(frame, reveal_area);
        }
        self.view.jump_hits.clear();
        if jump_rows > 0 {
            self.render_jumps(frame, jump_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::Deck;
    use crate::tui::view::DeckView;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn text_of(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_scrollable_body_is_measured() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();

        let panel = view.panel_mut(1).unwrap();
        terminal
            .draw(|f| SectionPanel::new(&deck.sections[1], panel).render(f, f.area()))
            .unwrap();

        let panel = view.panel(1).unwrap();
        assert_eq!(panel.viewport_rows, 16 - HEADING_ROWS - REVEAL_ROWS);
        assert!(panel.content_rows > panel.viewport_rows);
        assert!(text_of(&terminal).contains("Nested content scrolls first"));
    }

    #[test]
    fn test_hidden_reveal_items_are_not_drawn() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let backend = TestBackend::new(90, 12);
        let mut terminal = Terminal::new(backend).unwrap();

        let panel = view.panel_mut(1).unwrap();
        panel.revealed = vec![true, false, false];
        terminal
            .draw(|f| SectionPanel::new(&deck.sections[1], panel).render(f, f.area()))
            .unwrap();

        let text = text_of(&terminal);
        assert!(text.contains("Reach the edge"));
        assert!(!text.contains("Scroll again to leave"));
    }

    #[test]
    fn test_carousel_card_and_position() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let backend = TestBackend::new(80, 14);
        let mut terminal = Terminal::new(backend).unwrap();

        let panel = view.panel_mut(2).unwrap();
        let state = CarouselState {
            current_index: 1,
            total: 3,
        };
        terminal
            .draw(|f| {
                SectionPanel::new(&deck.sections[2], panel)
                    .with_carousel(Some(state))
                    .render(f, f.area())
            })
            .unwrap();

        let text = text_of(&terminal);
        assert!(text.contains("2/3"));
        assert!(text.contains("They are dropped"));
        assert!(text.contains("○●○"));
    }

    #[test]
    fn test_jump_buttons_record_hits() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();

        let panel = view.panel_mut(0).unwrap();
        terminal
            .draw(|f| SectionPanel::new(&deck.sections[0], panel).render(f, f.area()))
            .unwrap();

        assert!(text_of(&terminal).contains("Skip to the FAQ →"));
        let hits = &view.panel(0).unwrap().jump_hits;
        assert_eq!(hits.len(), 1);
        let (rect, to) = hits[0];
        assert_eq!(to, 2);
        assert_eq!(rect.y, 11);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn test_carousel_ignored_for_section_without_cards() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let state = CarouselState {
            current_index: 0,
            total: 3,
        };
        let panel = SectionPanel::new(&deck.sections[0], view.panel_mut(0).unwrap())
            .with_carousel(Some(state));
        assert!(panel.carousel.is_none());
    }
}
