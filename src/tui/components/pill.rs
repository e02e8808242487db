//! # Pill Component
//!
//! The navigation indicator drawn at the right edge: one bar per section and
//! the active section's label underneath. While a label swap runs, a small
//! arrow shows which way the text is travelling and the text is dimmed until
//! the incoming label settles.
//!
//! ```text
//!   ━━
//!   ██   ← active marker
//!   ━━
//!
//!  Vision
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::nav::indicator::{IndicatorTarget, LabelMotion, LabelSwap};
use crate::tui::component::Component;

const MARKER_WIDTH: u16 = 2;
const MARGIN: u16 = 1;

pub struct Pill {
    pub marker_count: usize,
    pub active: usize,
    pub label: String,
    /// Swap in progress and its progress in `0.0..=1.0`.
    pub swap: Option<(LabelSwap, f32)>,
}

impl Pill {
    pub fn new(marker_count: usize, active: usize, label: String) -> Self {
        Self {
            marker_count,
            active,
            label,
            swap: None,
        }
    }

    pub fn with_swap(mut self, swap: LabelSwap, progress: f32) -> Self {
        self.swap = Some((swap, progress));
        self
    }

    /// Where the pill sits inside `area`: markers, a gap, then the label row.
    pub fn layout(area: Rect, marker_count: usize, label_width: u16) -> Rect {
        let width = label_width.max(MARKER_WIDTH) + 2;
        let height = (marker_count as u16 + 2).min(area.height);
        let x = area.right().saturating_sub(width + MARGIN).max(area.x);
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height)
    }

    /// Translates a click at (column, row) into a pill target.
    pub fn hit_test(pill: Rect, marker_count: usize, column: u16, row: u16) -> Option<IndicatorTarget> {
        if !pill.contains((column, row).into()) {
            return None;
        }
        let offset = (row - pill.y) as usize;
        if offset < marker_count {
            Some(IndicatorTarget::Marker(offset))
        } else if offset == marker_count + 1 {
            Some(IndicatorTarget::Label)
        } else {
            None
        }
    }

    pub fn label_width(label: &str) -> u16 {
        UnicodeWidthStr::width(label) as u16 + 2
    }
}

impl Component for Pill {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = (0..self.marker_count)
            .map(|i| {
                if i == self.active {
                    Line::from(Span::styled("██", Style::default().fg(Color::Cyan)))
                } else {
                    Line::from(Span::styled("━━", Style::default().fg(Color::DarkGray)))
                }
            })
            .collect();
        lines.push(Line::raw(""));

        let label = match &self.swap {
            // First half: outgoing text leaves; second half: incoming arrives.
            Some((swap, progress)) => {
                let arrow = match swap.motion {
                    LabelMotion::Up => "▴",
                    LabelMotion::Down => "▾",
                };
                let text = if *progress < 0.5 {
                    &swap.outgoing
                } else {
                    &swap.incoming
                };
                Line::from(vec![
                    Span::styled(arrow, Style::default().fg(Color::DarkGray)),
                    Span::styled(text.clone(), Style::default().add_modifier(Modifier::DIM)),
                ])
            }
            None => Line::from(Span::styled(
                self.label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        };
        lines.push(label);

        frame.render_widget(Paragraph::new(lines).centered(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intent::Direction;
    use crate::nav::indicator::NavIndicator;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

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
    fn test_layout_is_right_aligned_and_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let pill = Pill::layout(area, 3, 8);
        assert_eq!(pill.height, 5);
        assert_eq!(pill.right() + MARGIN, 80);
        assert_eq!(pill.y, 9);
    }

    #[test]
    fn test_hit_test_markers_and_label() {
        let pill = Rect::new(70, 9, 10, 5);
        assert_eq!(Pill::hit_test(pill, 3, 72, 9), Some(IndicatorTarget::Marker(0)));
        assert_eq!(Pill::hit_test(pill, 3, 72, 11), Some(IndicatorTarget::Marker(2)));
        assert_eq!(Pill::hit_test(pill, 3, 72, 12), None);
        assert_eq!(Pill::hit_test(pill, 3, 72, 13), Some(IndicatorTarget::Label));
        assert_eq!(Pill::hit_test(pill, 3, 10, 13), None);
    }

    #[test]
    fn test_render_highlights_active_marker() {
        let backend = TestBackend::new(10, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut pill = Pill::new(3, 1, "Vision".to_string());
        terminal.draw(|f| pill.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let active_row: String = (0..10).map(|x| buffer[(x, 1)].symbol()).collect();
        assert!(active_row.contains("██"));
        assert!(text_of(&terminal).contains("Vision"));
    }

    #[test]
    fn test_render_swap_direction() {
        let mut indicator = NavIndicator::new(vec!["Home".into(), "Vision".into()]);
        let t0 = Instant::now();
        indicator.select(1, Direction::Forward, t0);
        let swap = indicator.swap(t0).unwrap().clone();

        let backend = TestBackend::new(10, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut pill = Pill::new(2, 1, "Vision".to_string()).with_swap(swap.clone(), 0.25);
        terminal.draw(|f| pill.render(f, f.area())).unwrap();
        let text = text_of(&terminal);
        assert!(text.contains("▴Home"));

        let mut pill = Pill::new(2, 1, "Vision".to_string())
            .with_swap(swap.clone(), swap.progress(t0 + Duration::from_millis(300)));
        terminal.draw(|f| pill.render(f, f.area())).unwrap();
        assert!(text_of(&terminal).contains("▴Vision"));
    }
}
