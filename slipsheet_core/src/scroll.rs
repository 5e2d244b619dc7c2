// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coexistence of the sheet drag with an embedded scroll region.
//!
//! A sheet often hosts scrollable content. Dragging the sheet and scrolling
//! that content share the same touch, so [`ScrollCoexistenceGuard`] decides:
//!
//! - whether a drag may begin at all: only when the touch is outside the
//!   region, or the region is scrolled to its top edge;
//! - whether the region may bounce: bounce is suppressed while the sheet is
//!   being pulled down, and restored when the drag goes above rest or ends.
//!
//! Bounce changes are returned as `Option<bool>` ("changed to this value")
//! and surface to the host as
//! [`SheetChanges::scroll_bounces`](crate::machine::SheetChanges::scroll_bounces).

use kurbo::{Point, Rect};

/// How the scroll region's content offset is compared against its top edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TopEdge {
    /// At the top when `offset <= 0`, so an overscrolled region still counts.
    #[default]
    AtOrBeyond,
    /// At the top only when `offset == 0`.
    Exact,
}

impl TopEdge {
    /// Returns whether `content_offset_y` is at the top edge.
    ///
    /// NaN offsets are never at the top.
    #[must_use]
    pub fn is_at_top(self, content_offset_y: f64) -> bool {
        match self {
            Self::AtOrBeyond => content_offset_y <= 0.0,
            Self::Exact => content_offset_y == 0.0,
        }
    }
}

/// The embedded scroll region as last reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRegion {
    /// Bounds of the region in the same space as touch locations.
    pub bounds: Rect,
    /// Vertical content offset; 0 at the top edge.
    pub content_offset_y: f64,
}

impl ScrollRegion {
    /// Creates a region scrolled to the top.
    #[must_use]
    pub const fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            content_offset_y: 0.0,
        }
    }
}

/// Gates the sheet drag against an embedded scroll region.
#[derive(Clone, Debug)]
pub struct ScrollCoexistenceGuard {
    top_edge: TopEdge,
    region: Option<ScrollRegion>,
    bounces: bool,
}

impl ScrollCoexistenceGuard {
    /// Creates a guard with no region and bounce enabled.
    #[must_use]
    pub const fn new(top_edge: TopEdge) -> Self {
        Self {
            top_edge,
            region: None,
            bounces: true,
        }
    }

    /// Returns the top-edge comparison in use.
    #[must_use]
    pub const fn top_edge(&self) -> TopEdge {
        self.top_edge
    }

    /// Returns the current region, if any.
    #[must_use]
    pub const fn region(&self) -> Option<&ScrollRegion> {
        self.region.as_ref()
    }

    /// Replaces the region.
    pub fn set_region(&mut self, region: Option<ScrollRegion>) {
        self.region = region;
    }

    /// Updates the region's content offset. Does nothing without a region.
    pub fn set_content_offset(&mut self, content_offset_y: f64) {
        if let Some(region) = &mut self.region {
            region.content_offset_y = content_offset_y;
        }
    }

    /// Whether the region is currently allowed to bounce.
    #[must_use]
    pub const fn bounces(&self) -> bool {
        self.bounces
    }

    /// Decides whether a drag starting at `touch` may begin.
    #[must_use]
    pub fn should_begin(&self, touch: Point) -> bool {
        match &self.region {
            None => true,
            Some(region) if !region.bounds.contains(touch) => true,
            Some(region) => self.top_edge.is_at_top(region.content_offset_y),
        }
    }

    /// The sheet drag always recognizes alongside the region's own pan.
    #[must_use]
    pub const fn should_recognize_simultaneously(&self) -> bool {
        true
    }

    /// A drag began: bounce is suppressed.
    pub fn drag_began(&mut self) -> Option<bool> {
        self.set_bounces(false)
    }

    /// The drag moved: bounce only while above the resting position.
    pub fn drag_moved(&mut self, raw_progress: f64) -> Option<bool> {
        self.set_bounces(raw_progress < 0.0)
    }

    /// The drag ended or was cancelled: bounce is restored.
    pub fn drag_ended(&mut self) -> Option<bool> {
        self.set_bounces(true)
    }

    fn set_bounces(&mut self, bounces: bool) -> Option<bool> {
        if self.bounces == bounces {
            None
        } else {
            self.bounces = bounces;
            Some(bounces)
        }
    }
}

impl Default for ScrollCoexistenceGuard {
    fn default() -> Self {
        Self::new(TopEdge::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard_with_region(top_edge: TopEdge, offset: f64) -> ScrollCoexistenceGuard {
        let mut guard = ScrollCoexistenceGuard::new(top_edge);
        guard.set_region(Some(ScrollRegion {
            bounds: Rect::new(0.0, 300.0, 400.0, 900.0),
            content_offset_y: offset,
        }));
        guard
    }

    #[test]
    fn no_region_always_begins() {
        let guard = ScrollCoexistenceGuard::default();
        assert!(guard.should_begin(Point::new(10.0, 10.0)));
        assert!(guard.should_recognize_simultaneously());
    }

    #[test]
    fn touch_outside_region_begins_even_when_scrolled() {
        let guard = guard_with_region(TopEdge::AtOrBeyond, 120.0);
        assert!(guard.should_begin(Point::new(50.0, 100.0)));
        assert!(
            !guard.should_begin(Point::new(50.0, 400.0)),
            "scrolled content inside the region owns the touch"
        );
    }

    #[test]
    fn top_edge_comparisons() {
        let inside = Point::new(50.0, 400.0);
        assert!(guard_with_region(TopEdge::AtOrBeyond, 0.0).should_begin(inside));
        assert!(guard_with_region(TopEdge::AtOrBeyond, -12.0).should_begin(inside));
        assert!(guard_with_region(TopEdge::Exact, 0.0).should_begin(inside));
        assert!(
            !guard_with_region(TopEdge::Exact, -12.0).should_begin(inside),
            "exact comparison rejects an overscrolled region"
        );
        assert!(!TopEdge::AtOrBeyond.is_at_top(f64::NAN));
    }

    #[test]
    fn content_offset_updates() {
        let mut guard = guard_with_region(TopEdge::AtOrBeyond, 80.0);
        let inside = Point::new(50.0, 400.0);
        assert!(!guard.should_begin(inside));
        guard.set_content_offset(0.0);
        assert!(guard.should_begin(inside));
    }

    #[test]
    fn bounce_follows_drag() {
        let mut guard = ScrollCoexistenceGuard::default();
        assert!(guard.bounces());
        assert_eq!(guard.drag_began(), Some(false));
        assert_eq!(guard.drag_moved(0.2), None, "already suppressed");
        assert_eq!(guard.drag_moved(0.0), None, "zero progress still suppresses");
        assert_eq!(guard.drag_moved(-0.05), Some(true));
        assert_eq!(guard.drag_moved(0.1), Some(false));
        assert_eq!(guard.drag_ended(), Some(true));
        assert_eq!(guard.drag_ended(), None);
    }
}
