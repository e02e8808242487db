//! # Navigation State
//!
//! The one piece of state every navigation component agrees on. It lives for
//! the whole page view and is handed to components through `NavContext`
//! rather than through a global.
//!
//! ```text
//! NavigationState
//! ├── sections: Vec<Section>     // fixed at load, one is Active
//! ├── current_index: usize       // 0 <= current_index < sections.len()
//! ├── is_transitioning: bool     // a Player task is in flight
//! └── is_locked: bool            // splash (or similar) forbids navigation
//! ```
//!
//! A transition may only start when neither flag is set, so at most one is
//! ever in flight.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::core::intent::Direction;

/// Layering of a section relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPosition {
    Above,
    Active,
    Below,
}

impl SectionPosition {
    /// Position of section `index` when `active` is shown.
    pub fn relative_to(index: usize, active: usize) -> Self {
        if index == active {
            SectionPosition::Active
        } else if index < active {
            SectionPosition::Above
        } else {
            SectionPosition::Below
        }
    }
}

/// A full-page panel of the deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub index: usize,
    pub name: String,
    pub position: SectionPosition,
}

/// A confirmed section change, produced by the gate and consumed by the Player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

#[derive(Debug)]
pub struct NavigationState {
    sections: Vec<Section>,
    current_index: usize,
    is_transitioning: bool,
    is_locked: bool,
}

impl NavigationState {
    /// Builds the state with section 0 active. `names` must not be empty;
    /// deck loading rejects empty decks before this point.
    pub fn new(names: Vec<String>, locked: bool) -> Self {
        let sections = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Section {
                index,
                name,
                position: SectionPosition::relative_to(index, 0),
            })
            .collect();
        Self {
            sections,
            current_index: 0,
            is_transitioning: false,
            is_locked: locked,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// True when a new input may be honored.
    pub fn is_idle(&self) -> bool {
        !self.is_transitioning && !self.is_locked
    }

    pub fn positions(&self) -> Vec<SectionPosition> {
        self.sections.iter().map(|s| s.position).collect()
    }

    /// Starts a transition to `target`.
    ///
    /// Returns `None` (and changes nothing) while locked or mid-flight, when
    /// `target` is out of range, or when it is already the current section.
    pub fn begin_transition(&mut self, target: usize) -> Option<TransitionPlan> {
        if !self.is_idle() {
            debug!(
                "Transition to {} refused (locked={}, transitioning={})",
                target, self.is_locked, self.is_transitioning
            );
            return None;
        }
        if target >= self.sections.len() || target == self.current_index {
            return None;
        }

        let plan = TransitionPlan {
            from: self.current_index,
            to: target,
            direction: Direction::between(self.current_index, target),
        };
        self.is_transitioning = true;
        self.current_index = target;
        info!(
            "Transition {} -> {} ({})",
            plan.from,
            plan.to,
            plan.direction.label()
        );
        Some(plan)
    }

    /// Rewrites every section's position around `active`.
    pub fn settle_positions(&mut self, active: usize) {
        for section in &mut self.sections {
            section.position = SectionPosition::relative_to(section.index, active);
        }
    }

    pub fn finish_transition(&mut self) {
        self.is_transitioning = false;
        debug!("Transition finished at section {}", self.current_index);
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.is_locked != locked {
            info!("Navigation {}", if locked { "locked" } else { "unlocked" });
        }
        self.is_locked = locked;
    }
}

/// Shared handle to the navigation state.
///
/// Cloning is cheap. Every component constructor takes one of these instead
/// of reaching for ambient state.
#[derive(Debug, Clone)]
pub struct NavContext {
    inner: Arc<Mutex<NavigationState>>,
}

impl NavContext {
    pub fn new(state: NavigationState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Locks the state. A poisoned lock is recovered: the state is plain data
    /// and every mutation leaves it consistent.
    pub fn state(&self) -> MutexGuard<'_, NavigationState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current_index(&self) -> usize {
        self.state().current_index()
    }

    pub fn section_count(&self) -> usize {
        self.state().section_count()
    }

    pub fn is_idle(&self) -> bool {
        self.state().is_idle()
    }

    pub fn unlock(&self) {
        self.state().set_locked(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_sections(locked: bool) -> NavigationState {
        NavigationState::new(
            vec!["Home".to_string(), "Vision".to_string(), "FAQ".to_string()],
            locked,
        )
    }

    #[test]
    fn test_new_state_starts_at_first_section() {
        let state = three_sections(false);
        assert_eq!(state.current_index(), 0);
        assert!(state.is_idle());
        assert_eq!(
            state.positions(),
            vec![
                SectionPosition::Active,
                SectionPosition::Below,
                SectionPosition::Below
            ]
        );
    }

    #[test]
    fn test_begin_transition_sets_flags() {
        let mut state = three_sections(false);
        let plan = state.begin_transition(2).unwrap();
        assert_eq!(plan.from, 0);
        assert_eq!(plan.to, 2);
        assert_eq!(plan.direction, Direction::Forward);
        assert!(state.is_transitioning());
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn test_only_one_transition_in_flight() {
        let mut state = three_sections(false);
        assert!(state.begin_transition(1).is_some());
        assert!(state.begin_transition(2).is_none());
        state.finish_transition();
        assert!(state.begin_transition(2).is_some());
    }

    #[test]
    fn test_locked_refuses_transition() {
        let mut state = three_sections(true);
        assert!(state.begin_transition(1).is_none());
        assert_eq!(state.current_index(), 0);
        state.set_locked(false);
        assert!(state.begin_transition(1).is_some());
    }

    #[test]
    fn test_out_of_range_and_current_are_noops() {
        let mut state = three_sections(false);
        assert!(state.begin_transition(3).is_none());
        assert!(state.begin_transition(0).is_none());
        assert!(!state.is_transitioning());
    }

    #[test]
    fn test_settle_positions_partitions_sections() {
        let mut state = three_sections(false);
        state.settle_positions(1);
        assert_eq!(
            state.positions(),
            vec![
                SectionPosition::Above,
                SectionPosition::Active,
                SectionPosition::Below
            ]
        );
    }

    #[test]
    fn test_context_unlock() {
        let ctx = NavContext::new(three_sections(true));
        assert!(!ctx.is_idle());
        ctx.unlock();
        assert!(ctx.is_idle());
        assert_eq!(ctx.section_count(), 3);
    }
}
