//! # Intents
//!
//! Every raw input (wheel tick, swipe, key press, pill click) is reduced to an
//! `Intent` before the gate sees it. The gate never looks at raw events.
//!
//! ```text
//! RawInput  →  InputNormalizer  →  Intent  →  TransitionGate
//! ```

use serde::{Deserialize, Serialize};

/// Which way a gesture points through the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of travel from `from` to `to`. Equal indices count as forward.
    pub fn between(from: usize, to: usize) -> Self {
        if to >= from {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Direction implied by a signed delta (positive = down/forward).
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }

    /// Unit step applied to a section or card index.
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// The input stream a directional intent came from.
///
/// Only wheel intents go through the accumulator; swipes and keys are already
/// one decision per gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Wheel,
    Swipe,
    Key,
}

/// Absolute navigation target. Bypasses nested scroll and carousel rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    /// `Home`
    First,
    /// `End`
    Last,
    /// Pill marker or section link with a declared index.
    Index(usize),
    /// Pill label click: next section, wrapping to the first.
    Cycle,
}

/// A normalized navigation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Relative move. `delta` is the signed raw amount (wheel units, swipe
    /// distance, or the configured key step) used to scroll nested regions.
    Step {
        direction: Direction,
        kind: GestureKind,
        delta: f64,
    },
    Jump(Jump),
}

impl Intent {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Intent::Step { direction, .. } => Some(*direction),
            Intent::Jump(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(0, 2), Direction::Forward);
        assert_eq!(Direction::between(2, 0), Direction::Backward);
    }

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(Direction::from_delta(12.0), Direction::Forward);
        assert_eq!(Direction::from_delta(-0.5), Direction::Backward);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Backward).unwrap();
        assert_eq!(json, "\"backward\"");
    }

    #[test]
    fn test_jump_intent_has_no_direction() {
        assert_eq!(Intent::Jump(Jump::First).direction(), None);
        let step = Intent::Step {
            direction: Direction::Forward,
            kind: GestureKind::Key,
            delta: 60.0,
        };
        assert_eq!(step.direction(), Some(Direction::Forward));
    }
}
