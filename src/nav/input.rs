//! # Input Normalizer
//!
//! Turns raw wheel, touch and keyboard events into `Intent`s.
//!
//! - **Wheel**: every non-zero tick becomes a `Step` carrying its raw delta.
//!   The nested-scroll and carousel rules need the raw ticks; only the final
//!   section-change rule feeds them through [`WheelAccumulator`].
//! - **Touch**: one decision per gesture, on touch-end, from the start/end
//!   distance. Short or mostly-horizontal swipes are ignored.
//! - **Keyboard**: arrows/page keys/space step; `Home`/`End` jump.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::config::NavTuning;
use crate::core::intent::{Direction, GestureKind, Intent, Jump};

/// Keys the navigator understands. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    PageDown,
    PageUp,
    Space,
    Home,
    End,
    Other,
}

/// A raw event as delivered by the host (terminal, browser, test).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// Positive `delta_y` scrolls down.
    Wheel { delta_y: f64 },
    TouchStart { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
    Key(NavKey),
}

pub struct InputNormalizer {
    tuning: NavTuning,
    touch_start: Option<(f64, f64)>,
}

impl InputNormalizer {
    pub fn new(tuning: NavTuning) -> Self {
        Self {
            tuning,
            touch_start: None,
        }
    }

    pub fn normalize(&mut self, input: RawInput) -> Option<Intent> {
        match input {
            RawInput::Wheel { delta_y } => {
                if delta_y == 0.0 {
                    return None;
                }
                Some(Intent::Step {
                    direction: Direction::from_delta(delta_y),
                    kind: GestureKind::Wheel,
                    delta: delta_y,
                })
            }
            RawInput::TouchStart { x, y } => {
                self.touch_start = Some((x, y));
                None
            }
            RawInput::TouchEnd { x, y } => {
                let (start_x, start_y) = self.touch_start.take()?;
                let delta_y = start_y - y;
                let delta_x = start_x - x;
                if delta_y.abs() < self.tuning.swipe_min_delta || delta_x.abs() > delta_y.abs() {
                    debug!("Swipe ignored (dx={delta_x:.0}, dy={delta_y:.0})");
                    return None;
                }
                Some(Intent::Step {
                    direction: Direction::from_delta(delta_y),
                    kind: GestureKind::Swipe,
                    delta: delta_y,
                })
            }
            RawInput::Key(key) => self.normalize_key(key),
        }
    }

    fn normalize_key(&self, key: NavKey) -> Option<Intent> {
        let step = self.tuning.key_scroll_step;
        let page = |direction: Direction| Intent::Step {
            direction,
            kind: GestureKind::Key,
            delta: step * direction.step() as f64,
        };
        match key {
            NavKey::ArrowDown | NavKey::PageDown | NavKey::Space => Some(page(Direction::Forward)),
            NavKey::ArrowUp | NavKey::PageUp => Some(page(Direction::Backward)),
            NavKey::Home => Some(Intent::Jump(Jump::First)),
            NavKey::End => Some(Intent::Jump(Jump::Last)),
            NavKey::Other => None,
        }
    }
}

/// Collapses a stream of wheel ticks into at most one decision per gesture.
///
/// Ticks are summed until the magnitude exceeds the threshold, which yields a
/// direction and clears the sum. A gap longer than the debounce window also
/// clears the sum, so residue from an old gesture never leaks into a new one.
#[derive(Debug)]
pub struct WheelAccumulator {
    threshold: f64,
    debounce: Duration,
    accumulated: f64,
    last_tick: Option<Instant>,
}

impl WheelAccumulator {
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            debounce,
            accumulated: 0.0,
            last_tick: None,
        }
    }

    pub fn feed(&mut self, delta: f64, now: Instant) -> Option<Direction> {
        if let Some(last) = self.last_tick
            && now.saturating_duration_since(last) >= self.debounce
        {
            self.accumulated = 0.0;
        }
        self.last_tick = Some(now);
        self.accumulated += delta;

        if self.accumulated.abs() > self.threshold {
            let direction = Direction::from_delta(self.accumulated);
            self.accumulated = 0.0;
            return Some(direction);
        }
        None
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }
}
