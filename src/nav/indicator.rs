//! # Navigation Indicator
//!
//! The pill: one marker per section plus the active section's label. It only
//! reflects `current_index`; clicks on it become jump intents and go through
//! the gate like any other input.
//!
//! When the label changes, the old one slides out and the new one slides in.
//! Moving forward, text travels up; moving backward, it travels down.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::core::intent::{Direction, Intent, Jump};

/// Length of the label slide animation.
pub const LABEL_SWAP: Duration = Duration::from_millis(400);

/// Which way label text moves during a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMotion {
    Up,
    Down,
}

impl From<Direction> for LabelMotion {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => LabelMotion::Up,
            Direction::Backward => LabelMotion::Down,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSwap {
    pub outgoing: String,
    pub incoming: String,
    pub motion: LabelMotion,
    started: Instant,
}

impl LabelSwap {
    /// 0.0 at the start of the slide, 1.0 when it is done.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (elapsed / LABEL_SWAP.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Parts of the pill that accept clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorTarget {
    Marker(usize),
    Label,
}

#[derive(Debug)]
pub struct NavIndicator {
    labels: Vec<String>,
    active: usize,
    label: String,
    swap: Option<LabelSwap>,
}

impl NavIndicator {
    pub fn new(labels: Vec<String>) -> Self {
        let label = labels.first().cloned().unwrap_or_default();
        Self {
            labels,
            active: 0,
            label,
            swap: None,
        }
    }

    /// Starts on `index` instead of the first marker, without a swap.
    pub fn starting_at(mut self, index: usize) -> Self {
        if let Some(label) = self.labels.get(index) {
            self.active = index;
            self.label = label.clone();
        }
        self
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn marker_count(&self) -> usize {
        self.labels.len()
    }

    /// Highlights `index` and starts a label swap if the label changes.
    pub fn select(&mut self, index: usize, direction: Direction, now: Instant) {
        self.active = index;
        let incoming = self.labels.get(index).cloned().unwrap_or_default();
        if incoming == self.label {
            return;
        }
        let outgoing = std::mem::replace(&mut self.label, incoming.clone());
        self.swap = Some(LabelSwap {
            outgoing,
            incoming,
            motion: direction.into(),
            started: now,
        });
    }

    /// The swap in progress at `now`, if any. Finished swaps are dropped.
    pub fn swap(&mut self, now: Instant) -> Option<&LabelSwap> {
        if self
            .swap
            .as_ref()
            .is_some_and(|s| s.progress(now) >= 1.0)
        {
            self.swap = None;
        }
        self.swap.as_ref()
    }

    /// Translates a click into the intent it requests.
    pub fn click(&self, target: IndicatorTarget) -> Intent {
        match target {
            IndicatorTarget::Marker(index) => Intent::Jump(Jump::Index(index)),
            IndicatorTarget::Label => Intent::Jump(Jump::Cycle),
        }
    }
}

/// Indicator shared between the Player (writer) and the renderer (reader).
#[derive(Debug, Clone)]
pub struct SharedIndicator(Arc<Mutex<NavIndicator>>);

impl SharedIndicator {
    pub fn new(indicator: NavIndicator) -> Self {
        Self(Arc::new(Mutex::new(indicator)))
    }

    pub fn lock(&self) -> MutexGuard<'_, NavIndicator> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
