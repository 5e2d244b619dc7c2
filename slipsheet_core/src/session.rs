// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-presentation state owned by the state machine.
//!
//! A [`TransitionSession`] is created by
//! [`SheetTransition::begin_presentation`](crate::machine::SheetTransition::begin_presentation)
//! and dropped when the dismissal animation completes, as the machine enters
//! [`Phase::Dismissed`]. Hosts only ever see it through a shared reference.

use kurbo::{Affine, Rect};

use crate::config::TransitionConfig;
use crate::driver::SheetFrame;

/// Lifecycle phase of a sheet.
///
/// ```text
///   Idle ──► Presenting ──► Presented ◄──► InteractiveDismissing ──► Dismissed
///                               │                                       ▲
///                               └──────► AnimatedDismissing ────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No presentation has been requested.
    #[default]
    Idle,
    /// The sheet is sliding in.
    Presenting,
    /// The sheet is at rest.
    Presented,
    /// The sheet follows a drag, or is restoring after one.
    InteractiveDismissing,
    /// The sheet is sliding out.
    AnimatedDismissing,
    /// The sheet is gone; the session has ended.
    Dismissed,
}

impl Phase {
    /// Short lowercase name, for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::Presented => "presented",
            Self::InteractiveDismissing => "interactive-dismissing",
            Self::AnimatedDismissing => "animated-dismissing",
            Self::Dismissed => "dismissed",
        }
    }
}

/// Sub-state of [`Phase::InteractiveDismissing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragState {
    /// The sheet follows the finger (or a host-driven percentage).
    Tracking,
    /// The drag was released below threshold; the sheet is animating back.
    Restoring,
}

/// Container geometry supplied by the host at presentation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetLayout {
    /// The container the sheet is presented in.
    pub container: Rect,
    /// Height the content asks for. Zero means "use the natural height".
    pub preferred_height: f64,
    /// Height the content would take unconstrained.
    pub natural_height: f64,
}

impl SheetLayout {
    /// Creates a layout with a preferred height and no natural fallback.
    #[must_use]
    pub const fn new(container: Rect, preferred_height: f64) -> Self {
        Self {
            container,
            preferred_height,
            natural_height: 0.0,
        }
    }

    /// Sets the natural height used when the preferred height is zero.
    #[must_use]
    pub const fn with_natural_height(mut self, natural_height: f64) -> Self {
        self.natural_height = natural_height;
        self
    }

    /// The height the sheet will actually take.
    ///
    /// Falls back to the natural height when the preferred height is not a
    /// positive finite number. Never negative.
    #[must_use]
    pub fn sheet_height(&self) -> f64 {
        let positive = |h: f64| h.is_finite() && h > 0.0;
        if positive(self.preferred_height) {
            self.preferred_height
        } else if positive(self.natural_height) {
            self.natural_height
        } else {
            0.0
        }
    }

    /// The sheet at rest: bottom-aligned in the container.
    #[must_use]
    pub fn resting_frame(&self) -> Rect {
        let c = self.container;
        Rect::new(c.x0, c.y1 - self.sheet_height(), c.x1, c.y1)
    }

    /// The sheet fully off-screen: its top edge on the container's bottom edge.
    #[must_use]
    pub fn offscreen_frame(&self) -> Rect {
        let c = self.container;
        Rect::new(c.x0, c.y1, c.x1, c.y1 + self.sheet_height())
    }
}

/// State of the single active presentation.
#[derive(Clone, Debug)]
pub struct TransitionSession {
    pub(crate) config: TransitionConfig,
    pub(crate) layout: SheetLayout,
    pub(crate) progress: f64,
    pub(crate) last_drag_velocity: f64,
    pub(crate) presented_frame: Rect,
    pub(crate) veto_active: bool,
    pub(crate) drag: Option<DragState>,
}

impl TransitionSession {
    pub(crate) fn new(config: TransitionConfig, layout: SheetLayout) -> Self {
        let presented_frame = layout.resting_frame();
        Self {
            config,
            layout,
            progress: 0.0,
            last_drag_velocity: 0.0,
            presented_frame,
            veto_active: false,
            drag: None,
        }
    }

    /// The configuration this presentation was started with.
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// The layout this presentation was started with.
    #[must_use]
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Dismissal progress of the current or last drag.
    ///
    /// Negative while the sheet is pulled above rest.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Velocity of the last drag sample, in points per second.
    #[must_use]
    pub fn last_drag_velocity(&self) -> f64 {
        self.last_drag_velocity
    }

    /// The frame captured when the current drag began.
    #[must_use]
    pub fn presented_frame(&self) -> Rect {
        self.presented_frame
    }

    /// Whether the policy vetoed dismissal when the current drag began.
    #[must_use]
    pub fn veto_active(&self) -> bool {
        self.veto_active
    }

    /// Sub-state of an interactive dismissal, if one is in progress.
    #[must_use]
    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Transform of the presenting content while the sheet is up.
    pub(crate) fn presented_transform(&self) -> Affine {
        self.config.from_view_transform.unwrap_or(Affine::IDENTITY)
    }

    /// The snapshot of a sheet at rest.
    pub(crate) fn rest_snapshot(&self) -> SheetFrame {
        SheetFrame {
            sheet: self.layout.resting_frame(),
            overlay_opacity: 1.0,
            presenting_transform: self.presented_transform(),
        }
    }

    /// The snapshot of a sheet that has left the screen.
    pub(crate) fn offscreen_snapshot(&self) -> SheetFrame {
        SheetFrame {
            sheet: self.layout.offscreen_frame(),
            overlay_opacity: 0.0,
            presenting_transform: Affine::IDENTITY,
        }
    }
}
