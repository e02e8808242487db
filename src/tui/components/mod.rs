//! # TUI Components
//!
//! UI components for the terminal front-end.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `Header`: Deck title, condensed once past the first section
//! - `Pill`: Navigation indicator (markers + label), also does hit testing
//! - `Splash`: Intro shown while navigation is locked
//! - `BackdropFrame`: One frame of the decorative backdrop
//!
//! ### Transient Components Over Persistent State
//!
//! - `SectionPanel`: created each frame around a section's `SectionView`;
//!   rendering measures the scrollable body for the gate.
//!
//! ### Collaborators
//!
//! - `Backdrop`: subscribes to `section-revealed` and runs only while its
//!   section is shown. Navigation never waits on it.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs       (this file)
//! ├── header.rs    (Top bar)
//! ├── pill.rs      (Navigation indicator)
//! ├── section.rs   (Section body, carousel card, reveal items)
//! ├── backdrop.rs  (Decorative collaborator)
//! └── splash.rs    (Intro while locked)
//! ```

mod backdrop;
mod header;
mod pill;
mod section;
mod splash;

pub use backdrop::{Backdrop, BackdropFrame};
pub use header::Header;
pub use pill::Pill;
pub use section::SectionPanel;
pub use splash::Splash;
