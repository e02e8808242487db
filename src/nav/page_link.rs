//! # Page-Link Navigator
//!
//! Variant of the gate for single-page decks that declare `prev`/`next`
//! links. Gestures don't change sections; they leave the page for the linked
//! one. It shares the splash lock, the wheel accumulator and the carousel
//! edge rule with the section gate.
//!
//! Navigation is one-shot: once a link is followed, everything else is
//! swallowed until the page is gone.

use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::time::sleep;

use crate::core::config::NavTuning;
use crate::core::deck::PageLinks;
use crate::core::intent::{Direction, GestureKind, Intent, Jump};
use crate::core::state::NavContext;
use crate::nav::carousel::{CarouselAdapter, CarouselOutcome, CarouselState};
use crate::nav::input::WheelAccumulator;
use crate::nav::player::{OverlayFade, SectionSurface};

/// Overlay fade before leaving the page.
pub const LINK_FADE: Duration = Duration::from_millis(350);
/// Delay between starting the fade and following the link.
pub const LINK_DELAY: Duration = Duration::from_millis(360);

#[derive(Debug, Clone, PartialEq)]
pub enum LinkDecision {
    Ignored,
    Swallowed,
    CarouselStepped(usize),
    /// Leave the page for this link.
    Navigate(String),
}

pub struct PageLinkNavigator {
    ctx: NavContext,
    links: PageLinks,
    wheel: WheelAccumulator,
    carousel: Option<CarouselAdapter>,
    navigating: bool,
}

impl PageLinkNavigator {
    pub fn new(ctx: NavContext, links: PageLinks, tuning: NavTuning) -> Self {
        Self {
            ctx,
            links,
            wheel: WheelAccumulator::new(tuning.wheel_threshold, tuning.wheel_debounce),
            carousel: None,
            navigating: false,
        }
    }

    pub fn with_carousel(mut self, carousel: CarouselAdapter) -> Self {
        self.carousel = Some(carousel);
        self
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    /// Host section of the carousel and its position.
    pub fn carousel_state(&self) -> Option<(usize, CarouselState)> {
        self.carousel.as_ref().map(|c| (c.section(), c.state()))
    }

    pub fn handle(&mut self, intent: Intent, now: Instant) -> LinkDecision {
        if self.navigating || self.ctx.state().is_locked() {
            return LinkDecision::Swallowed;
        }
        match intent {
            Intent::Step {
                direction,
                kind: GestureKind::Wheel,
                delta,
            } => self.wheel_step(direction, delta, now),
            Intent::Step {
                direction,
                kind: GestureKind::Swipe,
                ..
            } => self.go_direction(direction),
            Intent::Step {
                direction,
                kind: GestureKind::Key,
                ..
            } => match self.link_for(direction) {
                Some(_) => self.go_direction(direction),
                None => LinkDecision::Ignored,
            },
            // The pill label leads on.
            Intent::Jump(Jump::Cycle) => self.go_direction(Direction::Forward),
            Intent::Jump(_) => LinkDecision::Ignored,
        }
    }

    /// Follows a link attached to a pill marker.
    pub fn follow(&mut self, href: &str) -> LinkDecision {
        if self.navigating || self.ctx.state().is_locked() {
            return LinkDecision::Swallowed;
        }
        self.go(Some(href.to_string()))
    }

    fn wheel_step(&mut self, direction: Direction, delta: f64, now: Instant) -> LinkDecision {
        if let Some(carousel) = self.carousel.as_mut() {
            let outcome = carousel.intercept(direction, now);
            if outcome.consumed() {
                self.wheel.reset();
                return match outcome {
                    CarouselOutcome::Stepped(card) => LinkDecision::CarouselStepped(card),
                    _ => LinkDecision::Swallowed,
                };
            }
        }
        match self.wheel.feed(delta, now) {
            Some(direction) => self.go_direction(direction),
            None => LinkDecision::Swallowed,
        }
    }

    fn link_for(&self, direction: Direction) -> Option<&String> {
        match direction {
            Direction::Forward => self.links.next.as_ref(),
            Direction::Backward => self.links.prev.as_ref(),
        }
    }

    fn go_direction(&mut self, direction: Direction) -> LinkDecision {
        let link = self.link_for(direction).cloned();
        if link.is_none() {
            debug!("No {} link on this page", direction.label());
        }
        self.go(link)
    }

    fn go(&mut self, link: Option<String>) -> LinkDecision {
        let Some(link) = link else {
            return LinkDecision::Swallowed;
        };
        self.navigating = true;
        info!("Following page link to {}", link);
        LinkDecision::Navigate(link)
    }
}

/// Covers the page before the host follows a link.
pub async fn play_exit(surface: &dyn SectionSurface) {
    surface.fade_overlay(OverlayFade::ToOpaque, LINK_FADE);
    sleep(LINK_DELAY).await;
}
