//! # Section Transition Player
//!
//! Runs one confirmed section change from start to finish. The whole swap
//! happens behind an opaque overlay so the user never sees sections jump:
//!
//! ```text
//!  0ms    overlay fades to opaque ─────────┐
//!  350ms  swap content, positions, pill,   │ FADE_OUT
//!         broadcast section-revealed ──────┘
//!         overlay fades back to clear ─────┐
//!  +150ms reveal item 0                    │
//!  +250ms reveal item 1                    │ FADE_IN
//!  +350ms gate released ───────────────────┘
//!  ...    remaining reveal items, 100ms apart
//! ```
//!
//! There is no cancellation: once `play` starts it always runs to the end.
//! The timings are fixed.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until};

use crate::core::state::{NavContext, SectionPosition, TransitionPlan};
use crate::nav::indicator::SharedIndicator;
use crate::nav::reveal::{RevealBus, SectionRevealed};

pub const FADE_OUT: Duration = Duration::from_millis(350);
pub const FADE_IN: Duration = Duration::from_millis(350);
pub const REVEAL_BASE_DELAY: Duration = Duration::from_millis(150);
pub const REVEAL_STAGGER: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFade {
    ToOpaque,
    ToClear,
}

/// Whatever draws the sections. Written only by the Player.
pub trait SectionSurface: Send + Sync {
    /// Starts animating the full-coverage overlay towards `fade`.
    fn fade_overlay(&self, fade: OverlayFade, duration: Duration);
    fn set_content_visible(&self, section: usize, visible: bool);
    /// Puts the section's reveal items into their hidden state without
    /// animating, and returns how many there are.
    fn prime_reveals(&self, section: usize) -> usize;
    fn reveal_item(&self, section: usize, item: usize);
    fn apply_positions(&self, positions: &[SectionPosition]);
    /// Condensed header once the page is past its first section.
    fn set_header_condensed(&self, condensed: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    Reveal(usize),
    Release,
}

/// Post-swap timeline, ordered by offset from the broadcast.
fn timeline(reveal_count: usize) -> Vec<(Duration, Cue)> {
    let mut cues: Vec<(Duration, Cue)> = (0..reveal_count)
        .map(|i| (REVEAL_BASE_DELAY + REVEAL_STAGGER * i as u32, Cue::Reveal(i)))
        .collect();
    cues.push((FADE_IN, Cue::Release));
    cues.sort_by_key(|(at, _)| *at);
    cues
}

pub struct TransitionPlayer {
    ctx: NavContext,
    surface: Arc<dyn SectionSurface>,
    indicator: SharedIndicator,
    bus: Arc<RevealBus>,
}

impl TransitionPlayer {
    pub fn new(
        ctx: NavContext,
        surface: Arc<dyn SectionSurface>,
        indicator: SharedIndicator,
        bus: Arc<RevealBus>,
    ) -> Self {
        Self {
            ctx,
            surface,
            indicator,
            bus,
        }
    }

    /// Runs `plan` on its own task.
    pub fn spawn(self: &Arc<Self>, plan: TransitionPlan) -> JoinHandle<()> {
        let player = Arc::clone(self);
        tokio::spawn(async move { player.play(plan).await })
    }

    pub async fn play(&self, plan: TransitionPlan) {
        info!("Playing transition {} -> {}", plan.from, plan.to);

        self.surface.fade_overlay(OverlayFade::ToOpaque, FADE_OUT);
        sleep(FADE_OUT).await;

        // Overlay is opaque: swap behind it.
        let reveal_count = self.surface.prime_reveals(plan.to);
        self.surface.set_content_visible(plan.to, true);
        self.surface.set_content_visible(plan.from, false);

        let positions = {
            let mut state = self.ctx.state();
            state.settle_positions(plan.to);
            state.positions()
        };
        self.surface.apply_positions(&positions);
        self.surface.set_header_condensed(plan.to > 0);

        self.indicator
            .lock()
            .select(plan.to, plan.direction, std::time::Instant::now());

        self.bus.broadcast(SectionRevealed {
            index: plan.to,
            direction: plan.direction,
        });

        self.surface.fade_overlay(OverlayFade::ToClear, FADE_IN);
        let revealed_at = Instant::now();
        for (at, cue) in timeline(reveal_count) {
            sleep_until(revealed_at + at).await;
            match cue {
                Cue::Reveal(item) => self.surface.reveal_item(plan.to, item),
                Cue::Release => self.ctx.state().finish_transition(),
            }
        }
        debug!("Transition to {} fully played", plan.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intent::Direction;
    use crate::core::state::NavigationState;
    use crate::nav::indicator::NavIndicator;
    use crate::test_support::{RecordingSurface, SurfaceCall};
    use std::sync::Mutex;

    fn setup(
        reveals: usize,
    ) -> (
        Arc<TransitionPlayer>,
        NavContext,
        Arc<RecordingSurface>,
        SharedIndicator,
        Arc<Mutex<Vec<SectionRevealed>>>,
    ) {
        let names: Vec<String> = vec!["Home".into(), "Vision".into(), "FAQ".into()];
        let ctx = NavContext::new(NavigationState::new(names.clone(), false));
        let surface = Arc::new(RecordingSurface::new(reveals));
        let indicator = SharedIndicator::new(NavIndicator::new(names));
        let bus = RevealBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(move |e| sink.lock().unwrap().push(*e));
        let player = Arc::new(TransitionPlayer::new(
            ctx.clone(),
            surface.clone(),
            indicator.clone(),
            bus,
        ));
        (player, ctx, surface, indicator, seen)
    }

    #[test]
    fn test_timeline_orders_release_among_reveals() {
        let cues: Vec<Cue> = timeline(4).into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            cues,
            vec![
                Cue::Reveal(0),
                Cue::Reveal(1),
                Cue::Reveal(2),
                Cue::Release,
                Cue::Reveal(3)
            ]
        );
        assert_eq!(timeline(0), vec![(FADE_IN, Cue::Release)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_happens_behind_opaque_overlay() {
        let (player, ctx, surface, _indicator, seen) = setup(0);
        let plan = ctx.state().begin_transition(1).unwrap();
        let handle = player.spawn(plan);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Fade(OverlayFade::ToOpaque)]
        );
        assert!(seen.lock().unwrap().is_empty());

        handle.await.unwrap();
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::Fade(OverlayFade::ToOpaque),
                SurfaceCall::Prime(1),
                SurfaceCall::Visible(1, true),
                SurfaceCall::Visible(0, false),
                SurfaceCall::Positions(vec![
                    SectionPosition::Above,
                    SectionPosition::Active,
                    SectionPosition::Below
                ]),
                SurfaceCall::Header(true),
                SurfaceCall::Fade(OverlayFade::ToClear),
            ]
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![SectionRevealed {
                index: 1,
                direction: Direction::Forward
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_released_after_fade_in() {
        let (player, ctx, _surface, _indicator, _seen) = setup(0);
        let plan = ctx.state().begin_transition(2).unwrap();
        let handle = player.spawn(plan);

        tokio::time::sleep(FADE_OUT + Duration::from_millis(200)).await;
        assert!(ctx.state().is_transitioning());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!ctx.state().is_transitioning());
        assert_eq!(ctx.current_index(), 2);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_are_staggered() {
        let (player, ctx, surface, _indicator, _seen) = setup(3);
        let plan = ctx.state().begin_transition(1).unwrap();
        let handle = player.spawn(plan);

        tokio::time::sleep(FADE_OUT + Duration::from_millis(160)).await;
        assert_eq!(surface.revealed(), vec![0]);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(surface.revealed(), vec![0, 1]);
        handle.await.unwrap();
        assert_eq!(surface.revealed(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_follows_transition() {
        let (player, ctx, _surface, indicator, _seen) = setup(0);
        let plan = ctx.state().begin_transition(2).unwrap();
        player.play(plan).await;
        let ind = indicator.lock();
        assert_eq!(ind.active(), 2);
        assert_eq!(ind.label(), "FAQ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_backward_header_expands_on_first_section() {
        let (player, ctx, surface, _indicator, seen) = setup(0);
        let plan = ctx.state().begin_transition(1).unwrap();
        player.play(plan).await;
        let plan = ctx.state().begin_transition(0).unwrap();
        player.play(plan).await;
        assert!(surface.calls().contains(&SurfaceCall::Header(false)));
        assert_eq!(
            seen.lock().unwrap().last().copied(),
            Some(SectionRevealed {
                index: 0,
                direction: Direction::Backward
            })
        );
    }
}
