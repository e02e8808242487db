//! # Backdrop Component
//!
//! A decorative drift of dots behind one section. It knows nothing about
//! navigation beyond the `section-revealed` broadcast: it starts when told its
//! section was revealed and stops when told about any other section.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::nav::reveal::{RevealBus, SectionRevealed};
use crate::tui::component::Component;

const GLYPHS: [&str; 3] = ["·", "∙", "•"];
/// Cells per drift step, horizontally.
const SPACING: u16 = 7;

pub struct Backdrop {
    owner: usize,
    running_since: Mutex<Option<Instant>>,
}

impl Backdrop {
    /// A backdrop for section `owner`, subscribed to `bus`.
    pub fn attach(owner: usize, bus: &RevealBus) -> Arc<Self> {
        let backdrop = Arc::new(Self {
            owner,
            running_since: Mutex::new(None),
        });
        let listener = Arc::clone(&backdrop);
        bus.subscribe(move |event| listener.on_revealed(event));
        backdrop
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    fn on_revealed(&self, event: &SectionRevealed) {
        let mut running = self
            .running_since
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match (event.index == self.owner, running.is_some()) {
            (true, false) => {
                debug!("Backdrop for section {} started", self.owner);
                *running = Some(Instant::now());
            }
            (false, true) => {
                debug!("Backdrop for section {} stopped", self.owner);
                *running = None;
            }
            _ => {}
        }
    }

    /// Starts without waiting for a broadcast, for a section shown at load.
    pub fn start(&self) {
        let mut running = self
            .running_since
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        running.get_or_insert_with(Instant::now);
    }

    pub fn is_running(&self) -> bool {
        self.started().is_some()
    }

    fn started(&self) -> Option<Instant> {
        *self
            .running_since
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Animation frame at `now`, or `None` while stopped.
    pub fn frame_at(&self, now: Instant) -> Option<usize> {
        self.started()
            .map(|since| (now.saturating_duration_since(since).as_millis() / 120) as usize)
    }
}

/// One frame of a running backdrop.
pub struct BackdropFrame {
    pub frame: usize,
}

impl Component for BackdropFrame {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().fg(Color::DarkGray);
        let buffer = frame.buffer_mut();
        for row in 0..area.height {
            let shift = (self.frame + row as usize * 3) % SPACING as usize;
            let mut col = shift as u16;
            while col < area.width {
                let glyph = GLYPHS[(row as usize + col as usize + self.frame) % GLYPHS.len()];
                buffer.set_string(area.x + col, area.y + row, glyph, style);
                col += SPACING;
            }
        }
    }
}
