// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for sheet transitions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! state machine calls at each phase change, drag sample, release decision,
//! and animation boundary. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`GestureSummaryBuilder`] collects drag samples between `Began` and the
//! release and produces a [`GestureSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::driver::AnimationTag;
use crate::gesture::GesturePhase;
use crate::session::Phase;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What the machine decided when a drag was released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The dismissal was committed; the sheet slides out.
    Commit,
    /// The sheet animates back to rest.
    Restore,
    /// The sheet was already at rest; the machine returned to `Presented`
    /// without animating.
    Settle,
}

impl Decision {
    /// Short lowercase name, for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Restore => "restore",
            Self::Settle => "settle",
        }
    }
}

/// Which entry point was called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `begin_presentation`.
    BeginPresentation,
    /// `begin_dismissal`.
    BeginDismissal,
    /// `on_gesture_sample`.
    GestureSample,
    /// `cancel_interactive_dismissal`.
    CancelInteractive,
    /// `on_background_tap`.
    BackgroundTap,
    /// `on_animation_completed`.
    AnimationCompleted,
    /// `reset`.
    Reset,
    /// Percent-driven `update`.
    ScrubUpdate,
    /// Percent-driven `finish`.
    ScrubFinish,
}

impl CallKind {
    /// The entry point's method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeginPresentation => "begin_presentation",
            Self::BeginDismissal => "begin_dismissal",
            Self::GestureSample => "on_gesture_sample",
            Self::CancelInteractive => "cancel_interactive_dismissal",
            Self::BackgroundTap => "on_background_tap",
            Self::AnimationCompleted => "on_animation_completed",
            Self::Reset => "reset",
            Self::ScrubUpdate => "update",
            Self::ScrubFinish => "finish",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted on every phase transition.
#[derive(Clone, Copy, Debug)]
pub struct PhaseChangeEvent {
    /// Host time of the transition.
    pub at: HostTime,
    /// Phase before.
    pub from: Phase,
    /// Phase after.
    pub to: Phase,
}

/// Emitted for every drag sample the machine accepts.
#[derive(Clone, Copy, Debug)]
pub struct GestureEvent {
    /// Host time the sample was processed at.
    pub at: HostTime,
    /// Gesture phase of the sample.
    pub phase: GesturePhase,
    /// Raw vertical translation, in points.
    pub translation_y: f64,
    /// Vertical velocity, in points per second.
    pub velocity_y: f64,
    /// Progress after translation (and resistance, if any).
    pub progress: f64,
    /// Whether the resistance curve was applied.
    pub resisted: bool,
}

/// Emitted when a drag is released or cancelled.
#[derive(Clone, Copy, Debug)]
pub struct DecisionEvent {
    /// Host time of the decision.
    pub at: HostTime,
    /// What was decided.
    pub decision: Decision,
    /// Progress at release.
    pub progress: f64,
    /// Release velocity, in points per second.
    pub velocity: f64,
    /// Whether dismissal was vetoed for this drag.
    pub veto_active: bool,
    /// Length of the animation the decision started (zero for
    /// [`Decision::Settle`]).
    pub duration: Duration,
}

/// Emitted when a run-to-completion animation starts.
#[derive(Clone, Copy, Debug)]
pub struct AnimationStartEvent {
    /// Host time the animation starts at.
    pub at: HostTime,
    /// What the animation is for.
    pub tag: AnimationTag,
    /// Length of the animation.
    pub duration: Duration,
}

/// Emitted when a run-to-completion animation stops.
#[derive(Clone, Copy, Debug)]
pub struct AnimationEndEvent {
    /// Host time the animation stopped at.
    pub at: HostTime,
    /// What the animation was for.
    pub tag: AnimationTag,
    /// `false` if it was superseded before reaching its target.
    pub finished: bool,
}

/// Emitted when an entry point is called in a phase that does not accept it.
#[derive(Clone, Copy, Debug)]
pub struct IgnoredCallEvent {
    /// Host time of the call.
    pub at: HostTime,
    /// Which entry point.
    pub call: CallKind,
    /// Phase the machine was in.
    pub phase: Phase,
}

/// Per-drag summary produced by [`GestureSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct GestureSummary {
    /// Host time of the `Began` sample.
    pub began: HostTime,
    /// Host time of the release.
    pub ended: HostTime,
    /// Number of samples, including `Began` and the release.
    pub samples: u32,
    /// Largest progress seen.
    pub peak_progress: f64,
    /// Largest velocity magnitude seen, in points per second.
    pub peak_velocity: f64,
    /// Whether any sample was resisted.
    pub resisted: bool,
    /// Whether dismissal was vetoed for this drag.
    pub veto_active: bool,
    /// What the release decided.
    pub decision: Decision,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the state machine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called on every phase transition.
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        _ = e;
    }

    /// Called for every accepted drag sample.
    fn on_gesture(&mut self, e: &GestureEvent) {
        _ = e;
    }

    /// Called when a drag is released or cancelled.
    fn on_decision(&mut self, e: &DecisionEvent) {
        _ = e;
    }

    /// Called when a run-to-completion animation starts.
    fn on_animation_start(&mut self, e: &AnimationStartEvent) {
        _ = e;
    }

    /// Called when a run-to-completion animation stops.
    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        _ = e;
    }

    /// Called when an entry point is rejected.
    fn on_ignored_call(&mut self, e: &IgnoredCallEvent) {
        _ = e;
    }

    /// Called with a per-drag summary after the release decision.
    fn on_gesture_summary(&mut self, s: &GestureSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseChangeEvent`].
    #[inline]
    pub fn phase_change(&mut self, e: &PhaseChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureEvent`].
    #[inline]
    pub fn gesture(&mut self, e: &GestureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DecisionEvent`].
    #[inline]
    pub fn decision(&mut self, e: &DecisionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_decision(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationStartEvent`].
    #[inline]
    pub fn animation_start(&mut self, e: &AnimationStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animation_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationEndEvent`].
    #[inline]
    pub fn animation_end(&mut self, e: &AnimationEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animation_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`IgnoredCallEvent`].
    #[inline]
    pub fn ignored_call(&mut self, e: &IgnoredCallEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_ignored_call(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureSummary`].
    #[inline]
    pub fn gesture_summary(&mut self, s: &GestureSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_gesture_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// GestureSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects drag samples and produces a [`GestureSummary`] at release.
#[derive(Clone, Copy, Debug)]
pub struct GestureSummaryBuilder {
    began: HostTime,
    veto_active: bool,
    samples: u32,
    peak_progress: f64,
    peak_velocity: f64,
    resisted: bool,
}

impl GestureSummaryBuilder {
    /// Starts a summary for a drag that began at `began`.
    #[must_use]
    pub fn new(began: HostTime, veto_active: bool) -> Self {
        Self {
            began,
            veto_active,
            samples: 0,
            peak_progress: 0.0,
            peak_velocity: 0.0,
            resisted: false,
        }
    }

    /// Records one accepted sample.
    pub fn record(&mut self, e: &GestureEvent) {
        self.samples = self.samples.saturating_add(1);
        if e.progress > self.peak_progress {
            self.peak_progress = e.progress;
        }
        let speed = e.velocity_y.abs();
        if speed > self.peak_velocity {
            self.peak_velocity = speed;
        }
        self.resisted |= e.resisted;
    }

    /// Consumes the builder and produces the final [`GestureSummary`].
    #[must_use]
    pub fn finish(self, ended: HostTime, decision: Decision) -> GestureSummary {
        GestureSummary {
            began: self.began,
            ended,
            samples: self.samples,
            peak_progress: self.peak_progress,
            peak_velocity: self.peak_velocity,
            resisted: self.resisted,
            veto_active: self.veto_active,
            decision,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(progress: f64, velocity_y: f64) -> GestureEvent {
        GestureEvent {
            at: HostTime(0),
            phase: GesturePhase::Changed,
            translation_y: progress * 600.0,
            velocity_y,
            progress,
            resisted: false,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_gesture(&sample(0.1, 10.0));
        sink.on_phase_change(&PhaseChangeEvent {
            at: HostTime(0),
            from: Phase::Idle,
            to: Phase::Presenting,
        });
        sink.on_gesture_summary(&GestureSummaryBuilder::new(HostTime(0), false).finish(
            HostTime(1),
            Decision::Settle,
        ));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.gesture(&sample(0.1, 10.0));
        tracer.decision(&DecisionEvent {
            at: HostTime(0),
            decision: Decision::Commit,
            progress: 0.5,
            velocity: 0.0,
            veto_active: false,
            duration: Duration(10),
        });
    }

    #[test]
    fn summary_builder_tracks_peaks() {
        let mut builder = GestureSummaryBuilder::new(HostTime(100), true);
        builder.record(&sample(0.1, 200.0));
        builder.record(&sample(0.3, -1_200.0));
        builder.record(&GestureEvent {
            resisted: true,
            ..sample(0.2, 50.0)
        });

        let summary = builder.finish(HostTime(900), Decision::Restore);
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.peak_progress, 0.3);
        assert_eq!(summary.peak_velocity, 1_200.0, "peak is by magnitude");
        assert!(summary.resisted);
        assert!(summary.veto_active);
        assert_eq!(summary.ended.saturating_duration_since(summary.began), Duration(800));
    }

    #[test]
    fn summary_builder_with_no_samples() {
        let summary = GestureSummaryBuilder::new(HostTime(5), false).finish(HostTime(5), Decision::Settle);
        assert_eq!(summary.samples, 0);
        assert_eq!(summary.peak_progress, 0.0);
        assert!(!summary.resisted);
    }

    #[test]
    fn names() {
        assert_eq!(Decision::Commit.as_str(), "commit");
        assert_eq!(CallKind::CancelInteractive.as_str(), "cancel_interactive_dismissal");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            decisions: Vec<Decision>,
        }
        impl TraceSink for RecordingSink {
            fn on_decision(&mut self, e: &DecisionEvent) {
                self.decisions.push(e.decision);
            }
        }

        let mut sink = RecordingSink {
            decisions: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.decision(&DecisionEvent {
            at: HostTime(0),
            decision: Decision::Restore,
            progress: 0.2,
            velocity: 0.0,
            veto_active: false,
            duration: Duration(10),
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.decisions, &[Decision::Restore]);
    }
}
