//! # Deck View
//!
//! Presentation state of the deck, shared between the render loop and the
//! Player. The Player writes it through [`SectionSurface`]; the gate reads its
//! scroll metrics through [`DeckLayout`].
//!
//! Terminal rows are coarse, so scroll metrics are reported in units of
//! `ROW_UNITS` per row. One wheel notch (`NOTCH_UNITS`) then behaves like a
//! browser wheel tick against the same thresholds.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::core::deck::Deck;
use crate::core::state::SectionPosition;
use crate::nav::player::{OverlayFade, SectionSurface};
use crate::nav::scroll_edge::{DeckLayout, Overflow, ScrollMetrics, ScrollableRef, SectionLayout};

/// Scroll units per terminal row.
pub const ROW_UNITS: f64 = 20.0;
/// Wheel delta of one mouse-wheel notch.
pub const NOTCH_UNITS: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct SectionView {
    pub visible: bool,
    pub position: SectionPosition,
    /// Per reveal item: has it been revealed yet.
    pub revealed: Vec<bool>,
    scrollable: bool,
    pub scroll_top: u16,
    /// Measured during render.
    pub viewport_rows: u16,
    pub content_rows: u16,
    /// Screen rectangles of the jump buttons drawn last frame, with targets.
    pub jump_hits: Vec<(Rect, usize)>,
}

impl SectionView {
    fn max_scroll(&self) -> u16 {
        self.content_rows.saturating_sub(self.viewport_rows)
    }

    /// Scrolls by `delta` units, at least one row, clamped to the content.
    pub fn scroll_by(&mut self, delta: f64) {
        let mut rows = (delta / ROW_UNITS).round() as i32;
        if rows == 0 {
            rows = delta.signum() as i32;
        }
        let target = (self.scroll_top as i32)
            .saturating_add(rows)
            .clamp(0, self.max_scroll() as i32);
        self.scroll_top = target as u16;
    }

    /// Records the size measured by the last render.
    pub fn measure(&mut self, viewport_rows: u16, content_rows: u16) {
        self.viewport_rows = viewport_rows;
        self.content_rows = content_rows;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn is_scrollable(&self) -> bool {
        self.scrollable
    }
}

impl SectionLayout for SectionView {
    fn overflow(&self) -> Overflow {
        // Sections clip; the page itself never scrolls.
        Overflow::Hidden
    }

    fn child_count(&self) -> usize {
        usize::from(self.scrollable)
    }

    fn child_overflow(&self, _child: usize) -> Overflow {
        Overflow::Auto
    }

    fn metrics(&self, target: ScrollableRef) -> Option<ScrollMetrics> {
        match target {
            ScrollableRef::Child(0) if self.scrollable => Some(ScrollMetrics::new(
                self.scroll_top as f64 * ROW_UNITS,
                self.viewport_rows as f64 * ROW_UNITS,
                self.content_rows as f64 * ROW_UNITS,
            )),
            _ => None,
        }
    }
}

/// Linear opacity animation of the full-screen overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayAnim {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl OverlayAnim {
    fn settled(opacity: f32, now: Instant) -> Self {
        Self {
            from: opacity,
            to: opacity,
            started: now,
            duration: Duration::ZERO,
        }
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32()
            / self.duration.as_secs_f32();
        let t = t.clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[derive(Debug)]
pub struct DeckView {
    sections: Vec<SectionView>,
    overlay: OverlayAnim,
    header_condensed: bool,
}

impl DeckView {
    /// First section shown, its reveal items already in place.
    pub fn new(deck: &Deck) -> Self {
        let sections = deck
            .sections
            .iter()
            .enumerate()
            .map(|(index, spec)| SectionView {
                visible: index == 0,
                position: SectionPosition::relative_to(index, 0),
                revealed: vec![index == 0; spec.reveal.len()],
                scrollable: spec.scrollable,
                scroll_top: 0,
                viewport_rows: 0,
                content_rows: 0,
                jump_hits: Vec::new(),
            })
            .collect();
        Self {
            sections,
            overlay: OverlayAnim::settled(0.0, Instant::now()),
            header_condensed: false,
        }
    }

    pub fn panel(&self, index: usize) -> Option<&SectionView> {
        self.sections.get(index)
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut SectionView> {
        self.sections.get_mut(index)
    }

    pub fn panels(&self) -> &[SectionView] {
        &self.sections
    }

    /// Index of the section whose content is visible.
    pub fn shown(&self) -> Option<usize> {
        self.sections.iter().position(|s| s.visible)
    }

    pub fn overlay_opacity(&self, now: Instant) -> f32 {
        self.overlay.opacity(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !self.overlay.is_settled(now)
    }

    pub fn header_condensed(&self) -> bool {
        self.header_condensed
    }

    pub fn scroll_nested(&mut self, section: usize, delta: f64) {
        if let Some(panel) = self.sections.get_mut(section) {
            panel.scroll_by(delta);
        }
    }
}

impl DeckLayout for DeckView {
    fn section(&self, index: usize) -> Option<&dyn SectionLayout> {
        self.sections.get(index).map(|s| s as &dyn SectionLayout)
    }
}

/// `DeckView` shared between the render loop and the Player.
#[derive(Debug, Clone)]
pub struct SharedView(Arc<Mutex<DeckView>>);

impl SharedView {
    pub fn new(view: DeckView) -> Self {
        Self(Arc::new(Mutex::new(view)))
    }

    pub fn lock(&self) -> MutexGuard<'_, DeckView> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SectionSurface for SharedView {
    fn fade_overlay(&self, fade: OverlayFade, duration: Duration) {
        let now = Instant::now();
        let mut view = self.lock();
        let from = view.overlay.opacity(now);
        let to = match fade {
            OverlayFade::ToOpaque => 1.0,
            OverlayFade::ToClear => 0.0,
        };
        view.overlay = OverlayAnim {
            from,
            to,
            started: now,
            duration,
        };
    }

    fn set_content_visible(&self, section: usize, visible: bool) {
        if let Some(panel) = self.lock().panel_mut(section) {
            panel.visible = visible;
        }
    }

    fn prime_reveals(&self, section: usize) -> usize {
        match self.lock().panel_mut(section) {
            Some(panel) => {
                panel.revealed.iter_mut().for_each(|r| *r = false);
                panel.revealed.len()
            }
            None => 0,
        }
    }

    fn reveal_item(&self, section: usize, item: usize) {
        if let Some(slot) = self
            .lock()
            .panel_mut(section)
            .and_then(|panel| panel.revealed.get_mut(item))
        {
            *slot = true;
        }
    }

    fn apply_positions(&self, positions: &[SectionPosition]) {
        let mut view = self.lock();
        for (panel, position) in view.sections.iter_mut().zip(positions) {
            panel.position = *position;
        }
    }

    fn set_header_condensed(&self, condensed: bool) {
        self.lock().header_condensed = condensed;
    }
}
