// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interruptible, percent-drivable animation of a [`SheetFrame`].
//!
//! [`InteractiveDriver`] owns the live snapshot of everything the host draws
//! for a sheet: the sheet rectangle, the overlay opacity, and the transform
//! of the presenting content. It runs in one of three modes:
//!
//! - **still**: nothing moves;
//! - **animating**: a run-to-completion animation from one snapshot to
//!   another, sampled by [`sample`](InteractiveDriver::sample);
//! - **scrubbing**: a percent-driven transition, positioned directly by
//!   [`update`](InteractiveDriver::update) and later handed off to an
//!   animation by [`finish`](InteractiveDriver::finish) or
//!   [`cancel`](InteractiveDriver::cancel).
//!
//! Every new animation or scrub starts from the live snapshot, so the sheet
//! never jumps. An animation is pending until the next
//! [`sample`](InteractiveDriver::sample) stamps its start time, so a host that
//! was not ticking when the animation was requested still sees all of it. An
//! animation that is replaced before it completes reports a [`Completion`]
//! with `finished == false`.

use kurbo::{Affine, Rect};

use crate::config::RestoreTiming;
use crate::overlay::{clamp_opacity, finite_progress};
use crate::time::{Duration, HostTime};
use crate::timing::Easing;

/// Everything the host applies for one frame of a sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetFrame {
    /// Sheet rectangle in container coordinates.
    pub sheet: Rect,
    /// Overlay opacity in `[0, 1]`, multiplied into the mask alpha.
    pub overlay_opacity: f64,
    /// Transform applied to the presenting content.
    pub presenting_transform: Affine,
}

impl SheetFrame {
    /// Linearly interpolates toward `other`.
    ///
    /// `t` may leave `[0, 1]` (spring overshoot); the overlay opacity is
    /// clamped regardless.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = finite_progress(t);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        let a = self.sheet;
        let b = other.sheet;
        let ca = self.presenting_transform.as_coeffs();
        let cb = other.presenting_transform.as_coeffs();
        let mut coeffs = [0.0; 6];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = mix(ca[i], cb[i]);
        }
        Self {
            sheet: Rect::new(
                mix(a.x0, b.x0),
                mix(a.y0, b.y0),
                mix(a.x1, b.x1),
                mix(a.y1, b.y1),
            ),
            overlay_opacity: clamp_opacity(mix(self.overlay_opacity, other.overlay_opacity)),
            presenting_transform: Affine::new(coeffs),
        }
    }
}

/// What a run-to-completion animation is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTag {
    /// Slide in to rest.
    Present,
    /// Slide out to off-screen.
    Dismiss,
    /// Return to rest after a released drag.
    Restore,
}

impl AnimationTag {
    /// Short lowercase name, for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Dismiss => "dismiss",
            Self::Restore => "restore",
        }
    }
}

/// Reported when an animation stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Completion {
    /// Which animation stopped.
    pub tag: AnimationTag,
    /// `true` if it reached its target, `false` if it was superseded.
    pub finished: bool,
}

/// A run-to-completion animation, as handed to hosts that animate natively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    /// What the animation is for.
    pub tag: AnimationTag,
    /// Snapshot at the start.
    pub from: SheetFrame,
    /// Snapshot at the end.
    pub to: SheetFrame,
    /// Host time the animation starts at.
    ///
    /// Stamped by the first sample after the animation is requested; until
    /// then it holds [`HostTime::default`].
    pub start: HostTime,
    /// Length of the animation.
    pub duration: Duration,
    /// Easing shared by geometry and opacity.
    pub easing: Easing,
}

impl AnimationRequest {
    /// Linear fraction of the animation elapsed at `now`, in `[0, 1]`.
    #[must_use]
    pub fn fraction_at(&self, now: HostTime) -> f64 {
        self.duration
            .fraction_elapsed(now.saturating_duration_since(self.start))
    }

    /// Interpolated snapshot at `now`.
    #[must_use]
    pub fn frame_at(&self, now: HostTime) -> SheetFrame {
        let eased = self.easing.transform(self.fraction_at(now));
        self.from.lerp(&self.to, eased)
    }
}

#[derive(Clone, Copy, Debug)]
struct Scrub {
    from: SheetFrame,
    to: SheetFrame,
    percent: f64,
    full_duration: Duration,
    easing: Easing,
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Still,
    Pending(AnimationRequest),
    Animating(AnimationRequest),
    Scrubbing(Scrub),
}

/// Drives a [`SheetFrame`] through animations and percent-driven scrubs.
#[derive(Clone, Debug)]
pub struct InteractiveDriver {
    current: SheetFrame,
    mode: Mode,
}

impl InteractiveDriver {
    /// Creates a still driver at `frame`.
    #[must_use]
    pub const fn new(frame: SheetFrame) -> Self {
        Self {
            current: frame,
            mode: Mode::Still,
        }
    }

    /// The live snapshot as of the last sample, update, or jump.
    #[must_use]
    pub const fn current(&self) -> &SheetFrame {
        &self.current
    }

    /// The requested or running animation, if any.
    #[must_use]
    pub const fn active_animation(&self) -> Option<&AnimationRequest> {
        match &self.mode {
            Mode::Pending(request) | Mode::Animating(request) => Some(request),
            Mode::Still | Mode::Scrubbing(_) => None,
        }
    }

    /// Whether the active animation is still waiting for its first sample.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.mode, Mode::Pending(_))
    }

    /// Position of the scrub, if one is in progress.
    #[must_use]
    pub const fn percent_complete(&self) -> Option<f64> {
        match &self.mode {
            Mode::Scrubbing(scrub) => Some(scrub.percent),
            Mode::Still | Mode::Pending(_) | Mode::Animating(_) => None,
        }
    }

    /// Stops whatever is running and moves straight to `frame`.
    pub fn jump_to(&mut self, frame: SheetFrame) -> Option<Completion> {
        let superseded = self.supersede();
        self.current = frame;
        self.mode = Mode::Still;
        superseded
    }

    /// Requests an animation from the live snapshot to `to`.
    ///
    /// The animation starts at the next [`sample`](Self::sample). Returns the
    /// completion of the animation this one replaces, if any.
    pub fn animate(
        &mut self,
        to: SheetFrame,
        duration: Duration,
        easing: Easing,
        tag: AnimationTag,
    ) -> Option<Completion> {
        let superseded = self.supersede();
        self.mode = Mode::Pending(AnimationRequest {
            tag,
            from: self.current,
            to,
            start: HostTime::default(),
            duration,
            easing,
        });
        superseded
    }

    /// Starts a pending animation at `now` and returns it.
    ///
    /// Returns `None` when no animation is waiting to start.
    pub fn anchor(&mut self, now: HostTime) -> Option<AnimationRequest> {
        let Mode::Pending(mut request) = self.mode else {
            return None;
        };
        request.start = now;
        self.mode = Mode::Animating(request);
        Some(request)
    }

    /// Advances the active animation to `now`, starting it first if it is
    /// pending.
    ///
    /// Returns a finished [`Completion`] on the sample that reaches the
    /// target.
    pub fn sample(&mut self, now: HostTime) -> Option<Completion> {
        _ = self.anchor(now);
        let Mode::Animating(request) = self.mode else {
            return None;
        };
        if request.fraction_at(now) >= 1.0 {
            self.current = request.to;
            self.mode = Mode::Still;
            return Some(Completion {
                tag: request.tag,
                finished: true,
            });
        }
        self.current = request.frame_at(now);
        None
    }

    /// Moves the active animation to its target immediately.
    pub fn complete_now(&mut self) -> Option<Completion> {
        let (Mode::Pending(request) | Mode::Animating(request)) = self.mode else {
            return None;
        };
        self.current = request.to;
        self.mode = Mode::Still;
        Some(Completion {
            tag: request.tag,
            finished: true,
        })
    }

    /// Begins a percent-driven transition from the live snapshot (0 %) to
    /// `to` (100 %).
    ///
    /// `full_duration` and `easing` are used when the scrub is later
    /// finished or cancelled.
    pub fn begin(
        &mut self,
        to: SheetFrame,
        full_duration: Duration,
        easing: Easing,
    ) -> Option<Completion> {
        let superseded = self.supersede();
        self.mode = Mode::Scrubbing(Scrub {
            from: self.current,
            to,
            percent: 0.0,
            full_duration,
            easing,
        });
        superseded
    }

    /// Positions the scrub at `percent`, immediately.
    ///
    /// Non-finite input is treated as 0. Returns `false` when not scrubbing.
    pub fn update(&mut self, percent: f64) -> bool {
        let Mode::Scrubbing(scrub) = &mut self.mode else {
            return false;
        };
        scrub.percent = finite_progress(percent);
        self.current = scrub.from.lerp(&scrub.to, scrub.percent);
        true
    }

    /// Animates the remainder of the scrub to 100 %.
    ///
    /// The animation takes `full_duration × (1 − percent)`, divided by
    /// `speed_hint` when it is greater than 1.
    pub fn finish(&mut self, speed_hint: f64, tag: AnimationTag) -> bool {
        let Mode::Scrubbing(scrub) = self.mode else {
            return false;
        };
        let hint = if speed_hint.is_finite() && speed_hint > 1.0 {
            speed_hint
        } else {
            1.0
        };
        let remaining = 1.0 - scrub.percent.clamp(0.0, 1.0);
        let duration = scrub.full_duration.mul_f64(remaining / hint);
        self.mode = Mode::Still;
        self.animate(scrub.to, duration, scrub.easing, tag);
        true
    }

    /// Animates the scrub back to 0 %, for a duration chosen by `timing`.
    pub fn cancel(&mut self, timing: RestoreTiming, tag: AnimationTag) -> bool {
        let Mode::Scrubbing(scrub) = self.mode else {
            return false;
        };
        let duration = scrub.full_duration.mul_f64(timing.scale(scrub.percent));
        self.mode = Mode::Still;
        self.animate(scrub.from, duration, scrub.easing, tag);
        true
    }

    fn supersede(&mut self) -> Option<Completion> {
        match core::mem::replace(&mut self.mode, Mode::Still) {
            Mode::Pending(request) | Mode::Animating(request) => Some(Completion {
                tag: request.tag,
                finished: false,
            }),
            Mode::Still | Mode::Scrubbing(_) => None,
        }
    }
}
