//! # Section Navigation Controller
//!
//! Everything between a raw input event and a finished section change.
//!
//! ```text
//! RawInput ──▶ InputNormalizer ──▶ Intent ──▶ TransitionGate ──▶ Decision
//!                                               │   ▲                │
//!                          scroll_edge, edge_arm│   │NavContext      │ Transition(plan)
//!                          carousel ────────────┘   │                ▼
//!                                                   └──────── TransitionPlayer
//!                                                               │   │
//!                                              NavIndicator ◀───┘   └──▶ RevealBus
//! ```
//!
//! Nothing here touches a terminal. The host supplies layout through
//! [`scroll_edge::DeckLayout`] and drawing through [`player::SectionSurface`].

pub mod carousel;
pub mod edge_arm;
pub mod gate;
pub mod indicator;
pub mod input;
pub mod lock;
pub mod page_link;
pub mod player;
pub mod reveal;
pub mod scroll_edge;
