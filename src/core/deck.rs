//! # Deck Definition
//!
//! A deck is the static markup of the page: an ordered list of full-page
//! sections, read once at startup from a TOML file (or the built-in deck).
//!
//! ```toml
//! title = "Launch"
//!
//! [[sections]]
//! name = "Home"
//! heading = "Welcome"
//! body = "..."
//! reveal = ["first card", "second card"]
//! backdrop = true
//! jumps = [{ label = "Straight to the FAQ", to = 1 }]
//!
//! [[sections]]
//! name = "FAQ"
//! scrollable = true
//! carousel = ["Q1", "Q2", "Q3"]
//!
//! [links]            # optional: single-page decks that chain to others
//! next = "next.toml"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectionSpec {
    /// Short label shown in the pill indicator.
    pub name: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: String,
    /// Body lives in an inner scrollable container.
    #[serde(default)]
    pub scrollable: bool,
    /// Items that fade in one by one after the section is shown.
    #[serde(default)]
    pub reveal: Vec<String>,
    /// Cards of an embedded carousel, if any.
    #[serde(default)]
    pub carousel: Vec<String>,
    /// Draw the decorative backdrop behind this section.
    #[serde(default)]
    pub backdrop: bool,
    /// Buttons that jump straight to another section.
    #[serde(default)]
    pub jumps: Vec<SectionJump>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectionJump {
    pub label: String,
    /// Target section index. Out-of-range targets are ignored when clicked.
    pub to: usize,
}

/// Neighbouring decks for page-link navigation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug)]
pub enum DeckError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A deck must have at least one section.
    Empty,
    /// `links` declared on a deck with more than one section.
    BadLink(String),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::Io(e) => write!(f, "deck I/O error: {e}"),
            DeckError::Parse(e) => write!(f, "deck parse error: {e}"),
            DeckError::Empty => write!(f, "deck has no sections"),
            DeckError::BadLink(msg) => write!(f, "deck link error: {msg}"),
        }
    }
}

impl std::error::Error for DeckError {}

impl From<DeckError> for std::io::Error {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::Io(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

impl Deck {
    pub fn parse(source: &str) -> Result<Self, DeckError> {
        let deck: Deck = toml::from_str(source).map_err(DeckError::Parse)?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let source = fs::read_to_string(path).map_err(DeckError::Io)?;
        let deck = Self::parse(&source)?;
        info!(
            "Loaded deck '{}' ({} sections) from {}",
            deck.title,
            deck.sections.len(),
            path.display()
        );
        Ok(deck)
    }

    fn validate(&self) -> Result<(), DeckError> {
        if self.sections.is_empty() {
            return Err(DeckError::Empty);
        }
        if self.links.is_some() && self.sections.len() > 1 {
            return Err(DeckError::BadLink(format!(
                "links need a single-page deck, found {} sections",
                self.sections.len()
            )));
        }
        Ok(())
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    /// Index of the first section carrying a carousel.
    pub fn carousel_section(&self) -> Option<usize> {
        self.sections.iter().position(|s| !s.carousel.is_empty())
    }

    /// Index of the first section asking for the backdrop.
    pub fn backdrop_section(&self) -> Option<usize> {
        self.sections.iter().position(|s| s.backdrop)
    }

    /// True when this deck navigates by following links instead of sections.
    pub fn is_linked_page(&self) -> bool {
        self.links.is_some()
    }

    /// Resolves a link relative to the deck file that declared it.
    pub fn resolve_link(origin: Option<&Path>, link: &str) -> PathBuf {
        let path = PathBuf::from(link);
        if path.is_absolute() {
            return path;
        }
        match origin.and_then(Path::parent) {
            Some(dir) => dir.join(path),
            None => path,
        }
    }

    /// The deck shown when no file is configured.
    pub fn builtin() -> Self {
        Deck {
            title: "decknav".to_string(),
            links: None,
            sections: vec![
                SectionSpec {
                    name: "Home".to_string(),
                    heading: "Full-page navigation for the terminal".to_string(),
                    body: "Scroll, swipe (drag), or use the arrow keys to move between \
                           sections. Home and End jump to the ends. Click the pill on the \
                           right to jump directly, or its label to cycle."
                        .to_string(),
                    scrollable: false,
                    reveal: vec![
                        "One section at a time".to_string(),
                        "One transition in flight".to_string(),
                        "Nothing queued while moving".to_string(),
                    ],
                    carousel: Vec::new(),
                    backdrop: false,
                    jumps: vec![SectionJump {
                        label: "Skip to the FAQ".to_string(),
                        to: 2,
                    }],
                },
                SectionSpec {
                    name: "Vision".to_string(),
                    heading: "Nested content scrolls first".to_string(),
                    body: VISION_BODY.to_string(),
                    scrollable: true,
                    reveal: vec![
                        "Reach the edge".to_string(),
                        "Pause".to_string(),
                        "Scroll again to leave".to_string(),
                    ],
                    carousel: Vec::new(),
                    backdrop: true,
                    jumps: Vec::new(),
                },
                SectionSpec {
                    name: "FAQ".to_string(),
                    heading: "Frequently asked".to_string(),
                    body: "Scroll to move through the cards. At the first or last card, \
                           scroll twice to leave the section."
                        .to_string(),
                    scrollable: false,
                    reveal: Vec::new(),
                    carousel: vec![
                        "Why does my first scroll at the bottom do nothing?\n\n\
                         The first gesture that reaches an edge only arms it. \
                         A second gesture in the same direction leaves."
                            .to_string(),
                        "What happens to scrolls during a transition?\n\n\
                         They are dropped. Nothing is queued."
                            .to_string(),
                        "Can navigation get stuck behind the intro?\n\n\
                         No. A safety timeout unlocks it even if the intro never finishes."
                            .to_string(),
                    ],
                    backdrop: false,
                    jumps: vec![SectionJump {
                        label: "Back to the top".to_string(),
                        to: 0,
                    }],
                },
            ],
        }
    }
}

const VISION_BODY: &str = "This section keeps its text inside an inner scrollable \
container. While that container still has room to scroll, wheel and arrow input \
moves the text instead of the page.\n\n\
When the text reaches its bottom edge, the first gesture that hits the edge is \
absorbed. Only a second gesture in the same direction, after a short pause and \
within a second and a half, moves on to the next section. Without that pause a \
single long flick would scroll the text to its end and immediately throw you \
into the next section.\n\n\
The same rule applies at the top edge when scrolling backwards.\n\n\
Resize the terminal: whether the text overflows is measured again on every \
frame, so a tall enough window turns this back into an ordinary page.\n\n\
Line\nafter\nline\nof\nfiller\nso\nthat\nthe\ncontainer\noverflows\non\nmost\nterminals.";
