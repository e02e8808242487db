//! Terminal events to navigation input.
//!
//! The wheel becomes wheel deltas, a left-button drag becomes a touch swipe,
//! and a press and release on the same cell becomes a click on the pill or on
//! a section's jump button.

use ratatui::layout::Rect;

use crate::nav::indicator::IndicatorTarget;
use crate::nav::input::RawInput;
use crate::tui::component::EventHandler;
use crate::tui::components::Pill;
use crate::tui::event::TuiEvent;
use crate::tui::view::{NOTCH_UNITS, ROW_UNITS};

/// Touch units per terminal column. Cells are about twice as tall as wide.
pub const COL_UNITS: f64 = ROW_UNITS / 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Raw(RawInput),
    Pill(IndicatorTarget),
    /// A jump button asking for this section.
    Jump(usize),
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    /// Pill rectangle of the last frame.
    pub pill: Rect,
    pub marker_count: usize,
    /// Jump buttons of the shown section, last frame.
    pub jumps: Vec<(Rect, usize)>,
    pointer_down: Option<(u16, u16)>,
}

impl GestureTracker {
    fn touch_point(column: u16, row: u16) -> (f64, f64) {
        (column as f64 * COL_UNITS, row as f64 * ROW_UNITS)
    }

    fn click(&self, column: u16, row: u16) -> Option<Gesture> {
        if let Some(target) = Pill::hit_test(self.pill, self.marker_count, column, row) {
            return Some(Gesture::Pill(target));
        }
        self.jumps
            .iter()
            .find(|(rect, _)| rect.contains((column, row).into()))
            .map(|&(_, to)| Gesture::Jump(to))
    }
}

impl EventHandler for GestureTracker {
    type Event = Gesture;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Gesture> {
        match *event {
            TuiEvent::Key(key) => Some(Gesture::Raw(RawInput::Key(key))),
            TuiEvent::ScrollDown => Some(Gesture::Raw(RawInput::Wheel {
                delta_y: NOTCH_UNITS,
            })),
            TuiEvent::ScrollUp => Some(Gesture::Raw(RawInput::Wheel {
                delta_y: -NOTCH_UNITS,
            })),
            TuiEvent::PointerDown(column, row) => {
                self.pointer_down = Some((column, row));
                let (x, y) = Self::touch_point(column, row);
                Some(Gesture::Raw(RawInput::TouchStart { x, y }))
            }
            TuiEvent::PointerUp(column, row) => {
                if self.pointer_down.take() == Some((column, row)) {
                    return self.click(column, row);
                }
                let (x, y) = Self::touch_point(column, row);
                Some(Gesture::Raw(RawInput::TouchEnd { x, y }))
            }
            TuiEvent::Quit | TuiEvent::Resize | TuiEvent::Other => None,
        }
    }
}
