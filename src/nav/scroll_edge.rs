//! # Scroll-Edge Detector
//!
//! Finds the region inside a section that scrolls on its own, and reports
//! where that region sits relative to its top and bottom edges.
//!
//! Sections usually wrap their scrollable text in an inner container, so a
//! scrollable child wins over the section element itself. Only a child
//! counts as *nested*: a section that scrolls as a whole pages directly.

use crate::core::intent::Direction;

/// Computed vertical overflow of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    pub fn scrolls(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

/// Which element of a section scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollableRef {
    Child(usize),
    SectionItself,
}

impl ScrollableRef {
    pub fn is_nested(self) -> bool {
        matches!(self, ScrollableRef::Child(_))
    }
}

/// Scroll geometry of one element, in the host's units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    pub fn has_overflow(&self, epsilon: f64) -> bool {
        self.scroll_height > self.client_height + epsilon
    }

    pub fn at_top(&self, epsilon: f64) -> bool {
        self.scroll_top <= epsilon
    }

    pub fn at_bottom(&self, epsilon: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - epsilon
    }

    /// True when scrolling further in `direction` would leave the content.
    pub fn at_edge(&self, direction: Direction, epsilon: f64) -> bool {
        match direction {
            Direction::Forward => self.at_bottom(epsilon),
            Direction::Backward => self.at_top(epsilon),
        }
    }
}

/// Read-only view of one section's layout, implemented by the host.
pub trait SectionLayout {
    fn overflow(&self) -> Overflow;
    fn child_count(&self) -> usize;
    fn child_overflow(&self, child: usize) -> Overflow;
    /// `None` when the referenced element no longer exists.
    fn metrics(&self, target: ScrollableRef) -> Option<ScrollMetrics>;
}

/// Read-only view of the whole deck, implemented by the host.
pub trait DeckLayout {
    /// `None` when the host has no layout for that section yet.
    fn section(&self, index: usize) -> Option<&dyn SectionLayout>;
}

/// Returns the region of `section` that scrolls, preferring its first
/// scrollable child. `None` means the whole section takes part in paging.
pub fn detect(section: &dyn SectionLayout) -> Option<ScrollableRef> {
    (0..section.child_count())
        .find(|&child| section.child_overflow(child).scrolls())
        .map(ScrollableRef::Child)
        .or_else(|| section.overflow().scrolls().then_some(ScrollableRef::SectionItself))
}

/// A nested region of the active section that currently overflows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedRegion {
    pub target: ScrollableRef,
    pub metrics: ScrollMetrics,
}

/// Looks up the active section's nested region, if it overflows.
pub fn nested_region(
    layout: &dyn DeckLayout,
    section: usize,
    epsilon: f64,
) -> Option<NestedRegion> {
    let section = layout.section(section)?;
    let target = detect(section).filter(|t| t.is_nested())?;
    let metrics = section.metrics(target)?;
    metrics
        .has_overflow(epsilon)
        .then_some(NestedRegion { target, metrics })
}
