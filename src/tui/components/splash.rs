//! # Splash Component
//!
//! Intro shown while navigation is locked. The title types itself out; once
//! done (or skipped with any key) the run loop fires the ready signal.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// How long the intro plays before it signals ready.
pub const SPLASH_DURATION: Duration = Duration::from_millis(1800);

pub struct Splash {
    title: String,
    started: Instant,
    /// Set by `render`.
    now: Instant,
}

impl Splash {
    pub fn new(title: String, started: Instant) -> Self {
        Self {
            title,
            started,
            now: started,
        }
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= SPLASH_DURATION
    }

    /// Characters of the title typed so far.
    fn typed(&self) -> usize {
        let total = self.title.chars().count();
        let typing = SPLASH_DURATION.mul_f32(0.6).as_secs_f32();
        let elapsed = self.now.saturating_duration_since(self.started).as_secs_f32();
        ((elapsed / typing).min(1.0) * total as f32).ceil() as usize
    }

    pub fn at(mut self, now: Instant) -> Self {
        self.now = now;
        self
    }
}

impl Component for Splash {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let typed: String = self.title.chars().take(self.typed()).collect();
        let lines = vec![
            Line::from(Span::styled(
                typed,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let [center] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).centered(), center);
    }
}
