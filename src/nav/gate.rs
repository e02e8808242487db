//! # Transition Gate
//!
//! The state machine that decides what each intent does. It owns every piece
//! of gesture memory (wheel accumulator, edge arms, carousel) and is the only
//! writer of `current_index` outside the Player.
//!
//! ```text
//!            confirmed section change
//!   Idle ─────────────────────────────▶ Transitioning
//!    ▲                                        │
//!    └──────────── Player completes ──────────┘
//! ```
//!
//! Directional intents are tried in priority order:
//!
//! 1. a nested scrollable region of the active section that overflows
//!    (scroll it; at its edge, apply the two-gesture rule),
//! 2. the carousel, if its section is active,
//! 3. a plain section step (wheel input first passes the accumulator).
//!
//! Jumps skip 1 and 2. Anything arriving while locked or transitioning is
//! swallowed, never queued.

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::core::config::NavTuning;
use crate::core::intent::{Direction, GestureKind, Intent, Jump};
use crate::core::state::{NavContext, TransitionPlan};
use crate::nav::carousel::{CarouselAdapter, CarouselOutcome, CarouselState};
use crate::nav::edge_arm::{EdgeArm, EdgeVerdict};
use crate::nav::input::WheelAccumulator;
use crate::nav::reveal::{RevealBus, SectionRevealed};
use crate::nav::scroll_edge::{DeckLayout, ScrollableRef, nested_region};

/// What the host should do with the input that produced an intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Nothing to do; the host may let the input through.
    Ignored,
    /// Consumed with no visible effect.
    Swallowed,
    /// Scroll the active section's nested region by `delta`.
    ScrollNested { target: ScrollableRef, delta: f64 },
    /// The carousel moved to this card.
    CarouselStepped(usize),
    /// A section change started; hand the plan to the Player.
    Transition(TransitionPlan),
}

impl Decision {
    /// Whether the host must cancel its own default handling of the input.
    #[cfg(test)]
    pub fn suppresses_native(&self) -> bool {
        !matches!(self, Decision::Ignored)
    }
}

pub struct TransitionGate {
    ctx: NavContext,
    tuning: NavTuning,
    wheel: WheelAccumulator,
    nested_edge: EdgeArm,
    carousel: Option<CarouselAdapter>,
    bus: Arc<RevealBus>,
}

impl TransitionGate {
    pub fn new(ctx: NavContext, tuning: NavTuning) -> Self {
        Self {
            ctx,
            tuning,
            wheel: WheelAccumulator::new(tuning.wheel_threshold, tuning.wheel_debounce),
            nested_edge: EdgeArm::new(tuning.edge_settle, tuning.edge_window),
            carousel: None,
            bus: RevealBus::new(),
        }
    }

    pub fn with_carousel(mut self, carousel: CarouselAdapter) -> Self {
        self.carousel = Some(carousel);
        self
    }

    pub fn context(&self) -> &NavContext {
        &self.ctx
    }

    /// The broadcast the Player publishes on.
    pub fn bus(&self) -> Arc<RevealBus> {
        self.bus.clone()
    }

    pub fn on_section_revealed<F>(&self, handler: F)
    where
        F: Fn(&SectionRevealed) + Send + Sync + 'static,
    {
        self.bus.subscribe(handler);
    }

    /// Host section of the carousel and its position.
    pub fn carousel_state(&self) -> Option<(usize, CarouselState)> {
        self.carousel.as_ref().map(|c| (c.section(), c.state()))
    }

    /// Releases the splash lock.
    pub fn unlock(&self) {
        self.ctx.unlock();
    }

    pub fn handle(&mut self, intent: Intent, now: Instant, layout: &dyn DeckLayout) -> Decision {
        if !self.ctx.is_idle() {
            return Decision::Swallowed;
        }
        match intent {
            Intent::Step {
                direction,
                kind,
                delta,
            } => self.step(direction, kind, delta, now, layout),
            Intent::Jump(jump) => self.jump(jump),
        }
    }

    fn step(
        &mut self,
        direction: Direction,
        kind: GestureKind,
        delta: f64,
        now: Instant,
        layout: &dyn DeckLayout,
    ) -> Decision {
        let current = self.ctx.current_index();

        // 1. Nested scroll region
        if let Some(region) = nested_region(layout, current, self.tuning.edge_epsilon) {
            if !region.metrics.at_edge(direction, self.tuning.edge_epsilon) {
                self.nested_edge.disarm();
                return Decision::ScrollNested {
                    target: region.target,
                    delta,
                };
            }
            if self.nested_edge.push(direction, now) == EdgeVerdict::Absorb {
                return Decision::Swallowed;
            }
            debug!("Leaving nested region of section {}", current);
        }

        // 2. Carousel
        if let Some(carousel) = self.carousel.as_mut()
            && carousel.section() == current
        {
            let outcome = carousel.intercept(direction, now);
            if outcome.consumed() {
                self.wheel.reset();
                return match outcome {
                    CarouselOutcome::Stepped(card) => Decision::CarouselStepped(card),
                    _ => Decision::Swallowed,
                };
            }
        }

        // 3. Section step
        let direction = match kind {
            GestureKind::Wheel => match self.wheel.feed(delta, now) {
                Some(direction) => direction,
                None => return Decision::Swallowed,
            },
            GestureKind::Swipe | GestureKind::Key => direction,
        };
        let Some(target) = current.checked_add_signed(direction.step()) else {
            return Decision::Swallowed;
        };
        if target >= self.ctx.section_count() {
            return Decision::Swallowed;
        }
        self.begin(target)
    }

    fn jump(&mut self, jump: Jump) -> Decision {
        let (current, count) = {
            let state = self.ctx.state();
            (state.current_index(), state.section_count())
        };
        let target = match jump {
            Jump::First => 0,
            Jump::Last => count.saturating_sub(1),
            Jump::Index(index) => index,
            Jump::Cycle => (current + 1) % count.max(1),
        };
        if target >= count || target == current {
            debug!("Jump to {} ignored (current {}, count {})", target, current, count);
            return Decision::Ignored;
        }
        self.begin(target)
    }

    fn begin(&mut self, target: usize) -> Decision {
        let plan = self.ctx.state().begin_transition(target);
        match plan {
            Some(plan) => {
                self.wheel.reset();
                self.nested_edge.disarm();
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.disarm();
                }
                Decision::Transition(plan)
            }
            None => Decision::Swallowed,
        }
    }
}
