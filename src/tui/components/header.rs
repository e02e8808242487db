//! # Header Component
//!
//! Top bar showing the deck title. On the first section it is expanded (title
//! plus key hints); past the first section it condenses to a single line with
//! the current section's name.
//!
//! Stateless: all data comes in as props, same as the other display
//! components.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const HINTS: &str = "scroll / drag / ↑↓ · Home End · click the pill · q quits";

pub struct Header {
    pub title: String,
    pub section_name: String,
    pub condensed: bool,
}

impl Header {
    pub fn new(title: String, section_name: String, condensed: bool) -> Self {
        Self {
            title,
            section_name,
            condensed,
        }
    }

    /// Rows the header needs in its current state.
    pub fn height(condensed: bool) -> u16 {
        if condensed { 1 } else { 2 }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = Span::styled(
            self.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        );
        let lines = if self.condensed {
            vec![Line::from(vec![
                title,
                Span::styled(" · ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.section_name.clone()),
            ])]
        } else {
            vec![
                Line::from(title),
                Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray))),
            ]
        };
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(header: &mut Header, height: u16) -> String {
        let backend = TestBackend::new(80, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| header.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_expanded_header_shows_hints() {
        let mut header = Header::new("Launch".to_string(), "Home".to_string(), false);
        let text = rendered(&mut header, 2);
        assert!(text.contains("Launch"));
        assert!(text.contains("Home End"));
        assert!(!text.contains("Launch · Home"));
        assert!(!text[..80].contains("Home"));
    }

    #[test]
    fn test_condensed_header_shows_section() {
        let mut header = Header::new("Launch".to_string(), "FAQ".to_string(), true);
        let text = rendered(&mut header, 1);
        assert!(text.contains("Launch · FAQ"));
        assert!(!text.contains("q quits"));
    }

    #[test]
    fn test_height_follows_state() {
        assert_eq!(Header::height(true), 1);
        assert_eq!(Header::height(false), 2);
    }
}
