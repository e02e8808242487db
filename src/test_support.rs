//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::time::Duration;

use crate::core::intent::{Direction, GestureKind, Intent};
use crate::core::state::SectionPosition;
use crate::nav::player::{OverlayFade, SectionSurface};
use crate::nav::scroll_edge::{DeckLayout, Overflow, ScrollMetrics, ScrollableRef, SectionLayout};

/// A section with at most one child that may scroll.
pub struct FakeSection {
    child: Option<ScrollMetrics>,
}

impl SectionLayout for FakeSection {
    fn overflow(&self) -> Overflow {
        Overflow::Hidden
    }

    fn child_count(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child_overflow(&self, _child: usize) -> Overflow {
        Overflow::Auto
    }

    fn metrics(&self, target: ScrollableRef) -> Option<ScrollMetrics> {
        match target {
            ScrollableRef::Child(0) => self.child,
            _ => None,
        }
    }
}

/// Layout stand-in for a whole deck.
pub struct FakeDeck {
    sections: Vec<FakeSection>,
}

impl FakeDeck {
    /// `n` sections with nothing scrollable.
    pub fn flat(n: usize) -> Self {
        Self {
            sections: (0..n).map(|_| FakeSection { child: None }).collect(),
        }
    }

    /// Gives `section` a scrollable child with the given metrics.
    pub fn with_nested(
        mut self,
        section: usize,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
    ) -> Self {
        self.sections[section].child = Some(ScrollMetrics::new(
            scroll_top,
            client_height,
            scroll_height,
        ));
        self
    }

    pub fn set_scroll_top(&mut self, section: usize, scroll_top: f64) {
        if let Some(metrics) = self.sections[section].child.as_mut() {
            metrics.scroll_top = scroll_top;
        }
    }
}

impl DeckLayout for FakeDeck {
    fn section(&self, index: usize) -> Option<&dyn SectionLayout> {
        self.sections.get(index).map(|s| s as &dyn SectionLayout)
    }
}

/// A wheel step intent with the given vertical delta.
pub fn wheel(delta: f64) -> Intent {
    Intent::Step {
        direction: Direction::from_delta(delta),
        kind: GestureKind::Wheel,
        delta,
    }
}

/// Surface call as seen by `RecordingSurface`. Item reveals are tracked
/// separately so call order stays readable.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Fade(OverlayFade),
    Prime(usize),
    Visible(usize, bool),
    Positions(Vec<SectionPosition>),
    Header(bool),
}

/// Surface that records what the Player asked of it.
pub struct RecordingSurface {
    reveal_count: usize,
    calls: Mutex<Vec<SurfaceCall>>,
    revealed: Mutex<Vec<usize>>,
}

impl RecordingSurface {
    /// Every section reports `reveal_count` reveal items.
    pub fn new(reveal_count: usize) -> Self {
        Self {
            reveal_count,
            calls: Mutex::new(Vec::new()),
            revealed: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn revealed(&self) -> Vec<usize> {
        self.revealed.lock().unwrap().clone()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SectionSurface for RecordingSurface {
    fn fade_overlay(&self, fade: OverlayFade, _duration: Duration) {
        self.record(SurfaceCall::Fade(fade));
    }

    fn set_content_visible(&self, section: usize, visible: bool) {
        self.record(SurfaceCall::Visible(section, visible));
    }

    fn prime_reveals(&self, section: usize) -> usize {
        self.record(SurfaceCall::Prime(section));
        self.revealed.lock().unwrap().clear();
        self.reveal_count
    }

    fn reveal_item(&self, _section: usize, item: usize) {
        self.revealed.lock().unwrap().push(item);
    }

    fn apply_positions(&self, positions: &[SectionPosition]) {
        self.record(SurfaceCall::Positions(positions.to_vec()));
    }

    fn set_header_condensed(&self, condensed: bool) {
        self.record(SurfaceCall::Header(condensed));
    }
}
