//! # Nested Carousel Adapter
//!
//! An in-page card strip (the FAQ cards, say) gets first claim on vertical
//! gestures while its section is shown. Each gesture steps one card, with a
//! cooldown so a single flick doesn't skip several. At the first/last card
//! the edge rule applies: one gesture arms, the next lets the page move.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::intent::Direction;
use crate::nav::edge_arm::{EdgeArm, EdgeVerdict};

/// Surface of an embedded carousel.
pub trait Carousel {
    fn current_index(&self) -> usize;
    fn total(&self) -> usize;
    /// Out-of-range indices are ignored.
    fn go_to(&mut self, index: usize);
}

/// Snapshot of a carousel's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub total: usize,
}

/// A plain strip of `total` cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStrip {
    current: usize,
    total: usize,
}

impl CardStrip {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }
}

impl Carousel for CardStrip {
    fn current_index(&self) -> usize {
        self.current
    }

    fn total(&self) -> usize {
        self.total
    }

    fn go_to(&mut self, index: usize) {
        if index < self.total {
            self.current = index;
        }
    }
}

/// What the carousel did with a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselOutcome {
    /// Moved to this card.
    Stepped(usize),
    /// Would have stepped, but the previous step is too recent.
    CoolingDown,
    /// At the boundary; the gesture armed the edge.
    EdgeArmed,
    /// At the boundary with the edge confirmed; the page may move.
    PassThrough,
}

impl CarouselOutcome {
    pub fn consumed(self) -> bool {
        !matches!(self, CarouselOutcome::PassThrough)
    }
}

pub struct CarouselAdapter {
    section: usize,
    carousel: Box<dyn Carousel>,
    cooldown: Duration,
    last_step: Option<Instant>,
    edge: EdgeArm,
}

impl CarouselAdapter {
    /// `section` is the index of the section that hosts the carousel.
    pub fn new(
        section: usize,
        carousel: Box<dyn Carousel>,
        cooldown: Duration,
        edge_window: Duration,
    ) -> Self {
        Self {
            section,
            carousel,
            cooldown,
            last_step: None,
            // Carousel gestures are discrete steps; no settle period.
            edge: EdgeArm::new(Duration::ZERO, edge_window),
        }
    }

    pub fn section(&self) -> usize {
        self.section
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            current_index: self.carousel.current_index(),
            total: self.carousel.total(),
        }
    }

    pub fn intercept(&mut self, direction: Direction, now: Instant) -> CarouselOutcome {
        let state = self.state();
        if state.total == 0 {
            return CarouselOutcome::PassThrough;
        }
        let at_first = state.current_index == 0;
        let at_last = state.current_index + 1 >= state.total;
        let at_boundary = match direction {
            Direction::Forward => at_last,
            Direction::Backward => at_first,
        };

        if !at_boundary {
            self.edge.disarm();
            if let Some(last) = self.last_step
                && now.saturating_duration_since(last) < self.cooldown
            {
                return CarouselOutcome::CoolingDown;
            }
            let target = match direction {
                Direction::Forward => state.current_index + 1,
                Direction::Backward => state.current_index - 1,
            };
            self.carousel.go_to(target);
            self.last_step = Some(now);
            debug!("Carousel stepped to card {}", target);
            return CarouselOutcome::Stepped(target);
        }

        match self.edge.push(direction, now) {
            EdgeVerdict::Absorb => CarouselOutcome::EdgeArmed,
            EdgeVerdict::Release => CarouselOutcome::PassThrough,
        }
    }

    pub fn disarm(&mut self) {
        self.edge.disarm();
    }
}
