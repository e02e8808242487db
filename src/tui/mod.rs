//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the deck,
//! and turns terminal events into navigation input for [`crate::nav`].
//!
//! This is the only module that knows about ratatui and crossterm. The
//! controller sees the terminal only through [`view::DeckView`] (layout) and
//! [`view::SharedView`] (drawing surface).
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (splash, overlay fade, label swap, backdrop): draws every
//!   ~33ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events, terminal resize,
//!   or when a background transition touches the view.

mod component;
pub mod components;
mod event;
pub mod gesture;
mod ui;
pub mod view;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tokio::sync::Notify;

use crate::core::config::ResolvedConfig;
use crate::core::deck::Deck;
use crate::core::intent::{Intent, Jump};
use crate::core::state::{NavContext, NavigationState};
use crate::nav::carousel::{CardStrip, CarouselAdapter};
use crate::nav::gate::{Decision, TransitionGate};
use crate::nav::indicator::{IndicatorTarget, NavIndicator, SharedIndicator};
use crate::nav::input::InputNormalizer;
use crate::nav::lock::engage_splash_lock;
use crate::nav::page_link::{LinkDecision, PageLinkNavigator, play_exit};
use crate::nav::player::TransitionPlayer;
use crate::tui::component::EventHandler;
use crate::tui::components::{Backdrop, Splash};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::gesture::{Gesture, GestureTracker};
use crate::tui::ui::Scene;
use crate::tui::view::{DeckView, SharedView};

/// How a run of the deck ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    /// A page link was followed; the host loads this deck next.
    Follow(PathBuf),
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse capture, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// The navigation front end for the loaded deck.
enum Controller {
    Sections {
        gate: TransitionGate,
        player: Arc<TransitionPlayer>,
    },
    Links {
        nav: PageLinkNavigator,
        /// Link behind each pill marker; `None` for the current page.
        marker_links: Vec<Option<String>>,
    },
}

/// Pill labels and marker links for a linked page: previous, this, next.
fn link_markers(deck: &Deck) -> (NavIndicator, Vec<Option<String>>) {
    let links = deck.links.clone().unwrap_or_default();
    let current = deck
        .sections
        .first()
        .map(|s| s.name.clone())
        .unwrap_or_default();
    let mut labels = Vec::new();
    let mut marker_links = Vec::new();
    if let Some(prev) = links.prev {
        labels.push("Previous".to_string());
        marker_links.push(Some(prev));
    }
    let current_at = labels.len();
    labels.push(current);
    marker_links.push(None);
    if let Some(next) = links.next {
        labels.push("Next".to_string());
        marker_links.push(Some(next));
    }
    (
        NavIndicator::new(labels).starting_at(current_at),
        marker_links,
    )
}

fn carousel_for(deck: &Deck, config: &ResolvedConfig) -> Option<CarouselAdapter> {
    let section = deck.carousel_section()?;
    let cards = deck.sections[section].carousel.len();
    Some(CarouselAdapter::new(
        section,
        Box::new(CardStrip::new(cards)),
        config.tuning.carousel_cooldown,
        config.tuning.edge_window,
    ))
}

/// Runs `deck` until the user quits or a page link is followed.
///
/// Must be called from inside a tokio runtime: transitions, the splash lock
/// and page exits run as tasks.
pub fn run(
    deck: &Deck,
    deck_path: Option<&Path>,
    config: &ResolvedConfig,
) -> std::io::Result<Outcome> {
    let ctx = NavContext::new(NavigationState::new(deck.section_names(), false));
    let view = SharedView::new(DeckView::new(deck));
    let mut normalizer = InputNormalizer::new(config.tuning);
    let mut tracker = GestureTracker::default();

    let (indicator, mut controller) = if deck.is_linked_page() {
        let (indicator, marker_links) = link_markers(deck);
        let links = deck.links.clone().unwrap_or_default();
        let mut nav = PageLinkNavigator::new(ctx.clone(), links, config.tuning);
        if let Some(carousel) = carousel_for(deck, config) {
            nav = nav.with_carousel(carousel);
        }
        (
            SharedIndicator::new(indicator),
            Controller::Links { nav, marker_links },
        )
    } else {
        let indicator = SharedIndicator::new(NavIndicator::new(deck.section_names()));
        let mut gate = TransitionGate::new(ctx.clone(), config.tuning);
        if let Some(carousel) = carousel_for(deck, config) {
            gate = gate.with_carousel(carousel);
        }
        let player = Arc::new(TransitionPlayer::new(
            ctx.clone(),
            Arc::new(view.clone()),
            indicator.clone(),
            gate.bus(),
        ));
        (indicator, Controller::Sections { gate, player })
    };

    let backdrop = match (&controller, deck.backdrop_section()) {
        (Controller::Sections { gate, .. }, Some(owner)) => Some(Backdrop::attach(owner, &gate.bus())),
        _ => None,
    };
    if let Some(backdrop) = &backdrop
        && backdrop.owner() == 0
    {
        backdrop.start();
    }

    // Splash lock: navigation stays locked until the intro signals ready.
    let ready = Arc::new(Notify::new());
    let mut splash = None;
    if config.wait_for_splash {
        engage_splash_lock(
            ctx.clone(),
            Box::new(Arc::clone(&ready)),
            config.safety_timeout,
        );
        splash = Some(Splash::new(deck.title.clone(), Instant::now()));
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Page exits report back here once their fade has played.
    let (tx, rx) = mpsc::channel();
    let mut needs_redraw = true;

    let outcome = loop {
        let now = Instant::now();

        if let Some(intro) = &splash
            && (intro.is_done(now) || !ctx.state().is_locked())
        {
            debug!("Splash finished");
            splash = None;
            ready.notify_one();
            needs_redraw = true;
        }

        let animating = splash.is_some()
            || view.lock().is_animating(now)
            || indicator.lock().swap(now).is_some()
            || backdrop.as_ref().is_some_and(|b| b.is_running())
            || !ctx.is_idle();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let carousel = match &controller {
                Controller::Sections { gate, .. } => gate.carousel_state(),
                Controller::Links { nav, .. } => nav.carousel_state(),
            };
            let mut frame_splash = splash.take().map(|s| s.at(now));
            terminal.draw(|f| {
                let mut deck_view = view.lock();
                let mut pill = indicator.lock();
                tracker.pill = ui::pill_area(f.area(), deck_view.header_condensed(), &pill);
                tracker.marker_count = pill.marker_count();
                ui::draw_ui(
                    f,
                    Scene {
                        deck,
                        view: &mut deck_view,
                        indicator: &mut pill,
                        carousel,
                        backdrop: backdrop.as_deref(),
                        splash: frame_splash.as_mut(),
                        now,
                    },
                );
                tracker.jumps = deck_view
                    .shown()
                    .and_then(|shown| deck_view.panel(shown))
                    .map(|panel| panel.jump_hits.clone())
                    .unwrap_or_default();
            })?;
            splash = frame_splash;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => {
                    quit = true;
                    break;
                }
                TuiEvent::Resize => continue,
                _ => {}
            }

            // Any key or click skips the intro.
            if splash.is_some() {
                if matches!(
                    event,
                    TuiEvent::Key(_) | TuiEvent::Other | TuiEvent::PointerUp(..)
                ) {
                    debug!("Splash skipped");
                    splash = None;
                    ready.notify_one();
                }
                continue;
            }

            let Some(gesture) = tracker.handle_event(&event) else {
                continue;
            };
            let now = Instant::now();
            match &mut controller {
                Controller::Sections { gate, player } => {
                    let intent = match gesture {
                        Gesture::Raw(raw) => normalizer.normalize(raw),
                        Gesture::Pill(target) => Some(indicator.lock().click(target)),
                        Gesture::Jump(to) => Some(Intent::Jump(Jump::Index(to))),
                    };
                    let Some(intent) = intent else {
                        continue;
                    };
                    let mut deck_view = view.lock();
                    match gate.handle(intent, now, &*deck_view) {
                        Decision::ScrollNested { delta, .. } => {
                            deck_view.scroll_nested(gate.context().current_index(), delta);
                        }
                        Decision::Transition(plan) => {
                            drop(deck_view);
                            player.spawn(plan);
                        }
                        Decision::Ignored
                        | Decision::Swallowed
                        | Decision::CarouselStepped(_) => {}
                    }
                }
                Controller::Links { nav, marker_links } => {
                    let decision = match gesture {
                        Gesture::Pill(IndicatorTarget::Marker(index)) => {
                            match marker_links.get(index).cloned().flatten() {
                                Some(href) => nav.follow(&href),
                                None => LinkDecision::Ignored,
                            }
                        }
                        Gesture::Pill(IndicatorTarget::Label) => {
                            nav.handle(indicator.lock().click(IndicatorTarget::Label), now)
                        }
                        Gesture::Raw(raw) => match normalizer.normalize(raw) {
                            Some(intent) => nav.handle(intent, now),
                            None => LinkDecision::Ignored,
                        },
                        // A single page has nowhere to jump to.
                        Gesture::Jump(_) => LinkDecision::Ignored,
                    };
                    if let LinkDecision::Navigate(href) = decision {
                        let target = Deck::resolve_link(deck_path, &href);
                        let surface = view.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            play_exit(&surface).await;
                            if tx.send(target).is_err() {
                                warn!("Page exit finished after the deck closed");
                            }
                        });
                    }
                }
            }
        }

        if quit {
            break Outcome::Quit;
        }
        if let Ok(target) = rx.try_recv() {
            break Outcome::Follow(target);
        }
    };

    ratatui::restore();
    info!("Deck '{}' closed: {:?}", deck.title, outcome);
    Ok(outcome)
}
