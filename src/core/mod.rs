//! # Core Model
//!
//! Everything about a deck that is independent of how it is drawn.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Config (tuning)      │
//!                    │  • Deck (sections)      │
//!                    │  • State (nav flags)    │
//!                    │  • Intent (input)       │
//!                    │                         │
//!                    │  No I/O beyond loading. │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │   nav (controller)      │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │   tui (ratatui adapter) │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: layered settings and gesture tuning
//! - [`deck`]: the static section list, loaded from TOML
//! - [`state`]: `NavigationState` and the shared `NavContext`
//! - [`intent`]: `Intent`, `Direction`, `Jump`

pub mod config;
pub mod deck;
pub mod intent;
pub mod state;
