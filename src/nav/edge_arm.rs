//! Two-gesture rule for leaving an edge.
//!
//! The first gesture that reaches an edge (bottom of a nested region, last
//! carousel card) only arms it. A second gesture in the same direction
//! confirms and lets the section change through. Ticks that arrive within
//! the settle period belong to the arming gesture and just keep it alive;
//! after the window the arm has expired and the next tick re-arms.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::intent::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeVerdict {
    /// Swallow the input; the edge is (now) armed.
    Absorb,
    /// The arm was confirmed; continue to the section-change rule.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Armed,
    Released,
}

#[derive(Debug, Clone, Copy)]
struct Memory {
    direction: Direction,
    phase: Phase,
    last_tick: Instant,
}

#[derive(Debug)]
pub struct EdgeArm {
    settle: Duration,
    window: Duration,
    memory: Option<Memory>,
}

impl EdgeArm {
    pub fn new(settle: Duration, window: Duration) -> Self {
        Self {
            settle,
            window,
            memory: None,
        }
    }

    /// Records an input that pushes against the edge in `direction`.
    ///
    /// Once confirmed, the rest of the confirming gesture keeps releasing
    /// until it goes quiet for longer than the window.
    pub fn push(&mut self, direction: Direction, now: Instant) -> EdgeVerdict {
        let Some(memory) = self.memory.as_mut().filter(|m| m.direction == direction) else {
            return self.arm(direction, now);
        };
        let quiet = now.saturating_duration_since(memory.last_tick);
        if quiet > self.window {
            debug!("Edge memory expired after {:?}, re-arming", quiet);
            return self.arm(direction, now);
        }
        memory.last_tick = now;
        match memory.phase {
            Phase::Released => EdgeVerdict::Release,
            Phase::Armed if quiet >= self.settle => {
                memory.phase = Phase::Released;
                debug!("Edge confirmed ({})", direction.label());
                EdgeVerdict::Release
            }
            Phase::Armed => EdgeVerdict::Absorb,
        }
    }

    fn arm(&mut self, direction: Direction, now: Instant) -> EdgeVerdict {
        debug!("Edge armed ({})", direction.label());
        self.memory = Some(Memory {
            direction,
            phase: Phase::Armed,
            last_tick: now,
        });
        EdgeVerdict::Absorb
    }

    pub fn disarm(&mut self) {
        self.memory = None;
    }

    /// Direction armed (and not yet confirmed) that is still inside its
    /// window at `now`.
    #[cfg(test)]
    pub fn armed_direction(&self, now: Instant) -> Option<Direction> {
        self.memory
            .filter(|m| m.phase == Phase::Armed)
            .filter(|m| now.saturating_duration_since(m.last_tick) <= self.window)
            .map(|m| m.direction)
    }
}
