// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits at the host boundary.
//!
//! [`SheetTransition`](crate::machine::SheetTransition) implements all three
//! input traits, so a host can hand out narrower views of one machine to the
//! parts of its UI stack that need them:
//!
//! - [`PhaseDriver`]: the presentation controller: present, dismiss, drive
//!   time.
//! - [`PercentDrivenTransition`]: anything that scrubs the dismissal
//!   directly, without going through drag samples.
//! - [`GestureGate`]: the gesture recognizer delegate.
//!
//! In the other direction, hosts implement [`SheetPresenter`] to apply the
//! machine's output to their view tree.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     let changes = sheet.advance(now);
//!     presenter.apply(sheet.sheet_frame(), &changes);
//! }
//!
//! fn on_pan(sample: GestureSample) {
//!     sheet.on_gesture_sample(sample);
//! }
//! ```

use kurbo::Point;

use crate::config::TransitionConfig;
use crate::driver::{AnimationTag, SheetFrame};
use crate::machine::SheetChanges;
use crate::session::{Phase, SheetLayout};
use crate::time::HostTime;

/// Presentation lifecycle control.
pub trait PhaseDriver {
    /// Starts presenting a sheet. Returns `false` if not accepted.
    fn begin_presentation(&mut self, config: TransitionConfig, layout: SheetLayout) -> bool;

    /// Starts dismissing the sheet. Returns `false` if not accepted.
    fn begin_dismissal(&mut self, programmatic: bool) -> bool;

    /// Advances animations to `now` and drains the accumulated changes.
    fn advance(&mut self, now: HostTime) -> SheetChanges;

    /// Reports that a natively-run animation stopped.
    fn on_animation_completed(&mut self, tag: AnimationTag, finished: bool) -> bool;

    /// Current phase.
    fn phase(&self) -> Phase;
}

/// Direct, percent-driven control of an interactive dismissal.
///
/// `begin` enters the interactive phase; `update` positions the sheet;
/// `finish` or `cancel` hand off to an animation.
pub trait PercentDrivenTransition {
    /// Enters an interactive dismissal at 0 %.
    fn begin(&mut self) -> bool;

    /// Positions the dismissal at `percent`, immediately.
    fn update(&mut self, percent: f64) -> bool;

    /// Animates the remainder to 100 %, faster for larger `speed_hint`.
    fn finish(&mut self, speed_hint: f64) -> bool;

    /// Animates back to 0 %.
    fn cancel(&mut self) -> bool;

    /// Current position, 0 when no dismissal is in progress.
    fn percent_complete(&self) -> f64;
}

/// Gesture recognizer delegate decisions.
pub trait GestureGate {
    /// Whether a drag touching down at `touch` may begin.
    fn should_begin(&self, touch: Point) -> bool;

    /// Whether the drag may be recognized alongside other recognizers.
    fn should_recognize_simultaneously(&self) -> bool {
        true
    }
}

/// Applies machine output to a platform view tree.
pub trait SheetPresenter {
    /// Applies `frame`; `changes` says what changed since the last call.
    fn apply(&mut self, frame: &SheetFrame, changes: &SheetChanges);
}
