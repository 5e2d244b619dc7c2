// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation state machine.
//!
//! [`SheetTransition`] owns at most one [`TransitionSession`] and every piece
//! of state derived from it. The host calls entry points as events happen and
//! [`advance`](SheetTransition::advance) once per frame; each call to
//! `advance` samples the running animation and drains the [`SheetChanges`]
//! accumulated since the previous one.
//!
//! Entry points called in a phase that does not accept them return `false`
//! (or [`GestureOutcome::Ignored`]) and leave the machine untouched.
//!
//! # Release decision
//!
//! When a drag ends the machine either commits the dismissal or returns the
//! sheet to rest:
//!
//! - vetoed drags never commit; a drag that pulled the sheet down notifies
//!   [`SheetPolicy::on_dismissal_attempted`] and restores, timed by
//!   [`veto_restore_timing`](TransitionConfig::veto_restore_timing);
//! - otherwise the drag commits when its progress or its downward velocity
//!   is strictly past [`DismissThresholds`](crate::config::DismissThresholds);
//! - a drag released at or above rest settles without animating.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect, RoundedRect, RoundedRectRadii};

use crate::config::{MaskColor, TransitionConfig};
use crate::driver::{AnimationRequest, AnimationTag, Completion, InteractiveDriver, SheetFrame};
use crate::gesture::{DragTranslation, GesturePhase, GestureSample, GestureTranslator};
use crate::host::{GestureGate, PercentDrivenTransition, PhaseDriver};
use crate::overlay::{finite_progress, resting_opacity};
use crate::policy::{AllowDismiss, AppearanceEvent, SheetPolicy};
use crate::scroll::{ScrollCoexistenceGuard, ScrollRegion};
use crate::session::{DragState, Phase, SheetLayout, TransitionSession};
use crate::time::{Duration, HostTime, Timebase};
use crate::timing::{Easing, SpringTiming};
use crate::trace::{
    AnimationEndEvent, AnimationStartEvent, CallKind, Decision, DecisionEvent, GestureEvent,
    GestureSummaryBuilder, IgnoredCallEvent, NoopSink, PhaseChangeEvent, TraceSink, Tracer,
};

/// Upper bound on the flick speed-up of a committed slide-out.
pub const MAX_SPEED_HINT: f64 = 4.0;

/// What changed since the previous [`advance`](SheetTransition::advance).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetChanges {
    /// The phase the machine ended up in, if it changed.
    pub phase: Option<Phase>,
    /// Whether the sheet frame, overlay, or presenting transform moved.
    pub frame_changed: bool,
    /// The run-to-completion animation this advance started, if any.
    pub started: Option<AnimationRequest>,
    /// Animations that stopped, in order.
    pub completed: Vec<Completion>,
    /// New bounce setting for the embedded scroll region, if it changed.
    pub scroll_bounces: Option<bool>,
}

impl SheetChanges {
    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase.is_none()
            && !self.frame_changed
            && self.started.is_none()
            && self.completed.is_empty()
            && self.scroll_bounces.is_none()
    }
}

/// What the machine did with a drag sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// The sample was not accepted in the current phase.
    Ignored,
    /// An interactive dismissal began.
    Began,
    /// The sheet follows the drag.
    Tracking(DragTranslation),
    /// The drag was released or cancelled.
    Decided(Decision),
}

/// Orchestrates presentation, interactive dismissal, and animated dismissal
/// of one sheet.
///
/// `P` is the host policy and `S` the trace sink.
pub struct SheetTransition<P: SheetPolicy = AllowDismiss, S: TraceSink = NoopSink> {
    policy: P,
    sink: S,
    timebase: Timebase,
    now: HostTime,
    phase: Phase,
    session: Option<TransitionSession>,
    driver: InteractiveDriver,
    translator: GestureTranslator,
    guard: ScrollCoexistenceGuard,
    pending: SheetChanges,
    summary: Option<GestureSummaryBuilder>,
}

impl<P: SheetPolicy, S: TraceSink> fmt::Debug for SheetTransition<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetTransition")
            .field("timebase", &self.timebase)
            .field("now", &self.now)
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("driver", &self.driver)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

fn hidden_frame() -> SheetFrame {
    SheetFrame {
        sheet: Rect::ZERO,
        overlay_opacity: 0.0,
        presenting_transform: Affine::IDENTITY,
    }
}

impl<P: SheetPolicy> SheetTransition<P, NoopSink> {
    /// Creates an idle machine.
    #[must_use]
    pub fn new(policy: P, timebase: Timebase) -> Self {
        Self::with_trace_sink(policy, timebase, NoopSink)
    }
}

impl<P: SheetPolicy, S: TraceSink> SheetTransition<P, S> {
    /// Creates an idle machine that reports to `sink`.
    ///
    /// Events only reach the sink when the `trace` feature is enabled.
    #[must_use]
    pub fn with_trace_sink(policy: P, timebase: Timebase, sink: S) -> Self {
        Self {
            policy,
            sink,
            timebase,
            now: HostTime::default(),
            phase: Phase::Idle,
            session: None,
            driver: InteractiveDriver::new(hidden_frame()),
            translator: GestureTranslator::default(),
            guard: ScrollCoexistenceGuard::default(),
            pending: SheetChanges::default(),
            summary: None,
        }
    }

    // -- Queries ------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    /// The most recent time supplied to [`advance`](Self::advance).
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// The timebase durations are converted with.
    #[must_use]
    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// The full snapshot the host should draw.
    #[must_use]
    pub fn sheet_frame(&self) -> &SheetFrame {
        self.driver.current()
    }

    /// The sheet rectangle.
    #[must_use]
    pub fn current_frame(&self) -> Rect {
        self.driver.current().sheet
    }

    /// Overlay opacity in `[0, 1]`.
    #[must_use]
    pub fn current_overlay_opacity(&self) -> f64 {
        resting_opacity(self.phase).unwrap_or(self.driver.current().overlay_opacity)
    }

    /// The overlay color with the current opacity applied.
    ///
    /// Fully transparent when there is no session.
    #[must_use]
    pub fn overlay_color(&self) -> MaskColor {
        match &self.session {
            Some(session) => session
                .config
                .mask_color
                .with_opacity(self.current_overlay_opacity()),
            None => MaskColor::black(0.0),
        }
    }

    /// Transform of the presenting content.
    #[must_use]
    pub fn presenting_transform(&self) -> Affine {
        self.driver.current().presenting_transform
    }

    /// The sheet outline, with only the top corners rounded.
    #[must_use]
    pub fn sheet_shape(&self) -> RoundedRect {
        let radius = self
            .session
            .as_ref()
            .map_or(0.0, |session| session.config.corner_radius);
        RoundedRect::from_rect(
            self.current_frame(),
            RoundedRectRadii::new(radius, radius, 0.0, 0.0),
        )
    }

    /// Whether the embedded scroll region may currently bounce.
    #[must_use]
    pub fn scroll_bounces(&self) -> bool {
        self.guard.bounces()
    }

    /// The host policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutable access to the host policy.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// The trace sink.
    #[must_use]
    pub fn trace_sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the trace sink.
    pub fn trace_sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // -- Scroll region ------------------------------------------------------

    /// Sets or clears the embedded scroll region.
    pub fn set_scroll_region(&mut self, region: Option<ScrollRegion>) {
        self.guard.set_region(region);
    }

    /// Updates the embedded scroll region's content offset.
    pub fn set_scroll_offset(&mut self, content_offset_y: f64) {
        self.guard.set_content_offset(content_offset_y);
    }

    // -- Entry points -------------------------------------------------------

    /// Starts presenting a sheet laid out in `layout`.
    ///
    /// Accepted only in [`Phase::Idle`] and only for a configuration that
    /// passes [`TransitionConfig::validate`].
    pub fn begin_presentation(&mut self, config: TransitionConfig, layout: SheetLayout) -> bool {
        if self.phase != Phase::Idle || config.validate().is_err() {
            return self.ignored(CallKind::BeginPresentation);
        }

        let region = self.guard.region().copied();
        self.guard = ScrollCoexistenceGuard::new(config.top_edge);
        self.guard.set_region(region);
        self.translator = GestureTranslator::new(config.resistance.clone());

        let session = TransitionSession::new(config, layout);
        let offscreen = session.offscreen_snapshot();
        let rest = session.rest_snapshot();
        let duration = self.full_duration(&session);
        self.session = Some(session);

        let superseded = self.driver.jump_to(offscreen);
        self.note_superseded(superseded);
        self.pending.frame_changed = true;
        self.policy.on_appearance(AppearanceEvent::WillDisappear);
        self.set_phase(Phase::Presenting);
        self.start_animation(rest, duration, AnimationTag::Present);
        true
    }

    /// Starts dismissing a presented sheet.
    ///
    /// Programmatic dismissals slide out over the full duration.
    /// Non-programmatic ones enter [`Phase::InteractiveDismissing`] and wait
    /// for drag samples or percent updates.
    pub fn begin_dismissal(&mut self, programmatic: bool) -> bool {
        if self.phase != Phase::Presented {
            return self.ignored(CallKind::BeginDismissal);
        }
        let Some(session) = &self.session else {
            return self.ignored(CallKind::BeginDismissal);
        };

        if programmatic {
            let offscreen = session.offscreen_snapshot();
            let duration = self.full_duration(session);
            self.policy.on_appearance(AppearanceEvent::WillAppear);
            self.set_phase(Phase::AnimatedDismissing);
            self.start_animation(offscreen, duration, AnimationTag::Dismiss);
        } else {
            self.begin_interactive();
        }
        true
    }

    /// Feeds one drag sample.
    pub fn on_gesture_sample(&mut self, sample: GestureSample) -> GestureOutcome {
        let interaction_enabled = self
            .session
            .as_ref()
            .is_some_and(|session| session.config.interaction_enabled);
        if !interaction_enabled {
            self.ignored(CallKind::GestureSample);
            return GestureOutcome::Ignored;
        }

        match sample.phase {
            GesturePhase::Began => {
                if self.phase != Phase::Presented {
                    self.ignored(CallKind::GestureSample);
                    return GestureOutcome::Ignored;
                }
                self.begin_interactive();
                self.record_gesture(sample, &DragTranslation::REST);
                GestureOutcome::Began
            }
            GesturePhase::Changed => {
                if !self.is_tracking() {
                    self.ignored(CallKind::GestureSample);
                    return GestureOutcome::Ignored;
                }
                GestureOutcome::Tracking(self.track(sample))
            }
            GesturePhase::Ended => {
                if !self.is_tracking() {
                    self.ignored(CallKind::GestureSample);
                    return GestureOutcome::Ignored;
                }
                self.track(sample);
                GestureOutcome::Decided(self.release())
            }
            GesturePhase::Cancelled | GesturePhase::Failed => {
                if !self.is_tracking() {
                    self.ignored(CallKind::GestureSample);
                    return GestureOutcome::Ignored;
                }
                let decision = self.return_to_rest();
                self.finish_summary(decision);
                GestureOutcome::Decided(decision)
            }
        }
    }

    /// Abandons an interactive dismissal and returns the sheet to rest.
    ///
    /// Calling it again while the sheet is already restoring does nothing.
    pub fn cancel_interactive_dismissal(&mut self) -> bool {
        if !self.is_tracking() {
            return self.ignored(CallKind::CancelInteractive);
        }
        let decision = self.return_to_rest();
        self.finish_summary(decision);
        true
    }

    /// Handles a tap on the dimming overlay.
    ///
    /// Dismisses only when enabled by the configuration and allowed by the
    /// policy at this instant.
    pub fn on_background_tap(&mut self) -> bool {
        let enabled = self
            .session
            .as_ref()
            .is_some_and(|session| session.config.dismiss_on_background_tap);
        if self.phase != Phase::Presented || !enabled || !self.policy.may_dismiss() {
            return self.ignored(CallKind::BackgroundTap);
        }
        self.begin_dismissal(true)
    }

    /// Samples animations at `now` and drains the changes accumulated since
    /// the previous call.
    ///
    /// Animations requested since the previous call start at `now`, so a
    /// host that stopped ticking while the sheet was idle still sees every
    /// animation from its first frame.
    pub fn advance(&mut self, now: HostTime) -> SheetChanges {
        self.now = self.now.max(now);
        if let Some(request) = self.driver.anchor(self.now) {
            self.note_started(request);
        }
        if self.driver.active_animation().is_some() {
            self.pending.frame_changed = true;
            if let Some(completion) = self.driver.sample(self.now) {
                self.finish_animation(completion);
            }
        }
        core::mem::take(&mut self.pending)
    }

    /// Reports that an animation the host ran natively has stopped.
    ///
    /// The sheet is moved to the animation's target and the phase advances
    /// as if the animation had run here. Reports for animations that are not
    /// running are ignored, so repeating a report is harmless.
    pub fn on_animation_completed(&mut self, tag: AnimationTag, finished: bool) -> bool {
        let running = self.driver.active_animation().map(|request| request.tag);
        if running != Some(tag) {
            return self.ignored(CallKind::AnimationCompleted);
        }
        if let Some(request) = self.driver.anchor(self.now) {
            self.note_started(request);
        }
        self.driver.complete_now();
        self.pending.frame_changed = true;
        self.finish_animation(Completion { tag, finished });
        true
    }

    /// Returns a dismissed machine to [`Phase::Idle`].
    pub fn reset(&mut self) -> bool {
        if self.phase != Phase::Dismissed {
            return self.ignored(CallKind::Reset);
        }
        self.session = None;
        self.summary = None;
        let superseded = self.driver.jump_to(hidden_frame());
        self.note_superseded(superseded);
        self.pending.frame_changed = true;
        self.set_phase(Phase::Idle);
        true
    }

    // -- Interactive dismissal ----------------------------------------------

    fn is_tracking(&self) -> bool {
        self.phase == Phase::InteractiveDismissing
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.drag == Some(DragState::Tracking))
    }

    fn begin_interactive(&mut self) {
        let veto_active = !self.policy.may_dismiss();
        let current = self.driver.current().sheet;
        let Some(session) = &mut self.session else {
            return;
        };
        session.veto_active = veto_active;
        session.presented_frame = current;
        session.progress = 0.0;
        session.last_drag_velocity = 0.0;
        session.drag = Some(DragState::Tracking);
        let offscreen = session.offscreen_snapshot();
        let easing = easing_for(&session.config);
        let duration = Duration::from_secs_f64(session.config.duration, self.timebase);

        let superseded = self.driver.begin(offscreen, duration, easing);
        self.note_superseded(superseded);
        let bounces = self.guard.drag_began();
        self.note_bounces(bounces);
        self.summary = Some(GestureSummaryBuilder::new(self.now, veto_active));
        self.policy.on_appearance(AppearanceEvent::WillAppear);
        self.set_phase(Phase::InteractiveDismissing);
    }

    fn track(&mut self, sample: GestureSample) -> DragTranslation {
        let Some(session) = &mut self.session else {
            return DragTranslation::REST;
        };
        let height = session.presented_frame.height();
        let translation =
            self.translator
                .translate(sample.translation_y, height, session.veto_active);
        session.progress = finite_progress(translation.progress);
        session.last_drag_velocity = finite_progress(sample.velocity_y);
        let progress = session.progress;

        let bounces = self.guard.drag_moved(translation.raw_progress);
        self.note_bounces(bounces);
        // Above rest the sheet stays pinned; only the scroll region moves.
        self.driver.update(progress.max(0.0));
        self.pending.frame_changed = true;
        self.record_gesture(sample, &translation);
        translation
    }

    fn scrub_to(&mut self, percent: f64) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.progress = finite_progress(percent);
        let progress = session.progress;
        self.driver.update(progress.max(0.0));
        self.pending.frame_changed = true;
    }

    /// Decides the outcome of a released drag.
    fn release(&mut self) -> Decision {
        let Some(session) = &self.session else {
            return Decision::Settle;
        };
        let progress = session.progress;
        let velocity = session.last_drag_velocity;
        let veto_active = session.veto_active;
        let thresholds = session.config.thresholds;

        let decision = if veto_active {
            if progress > 0.0 {
                self.policy.on_dismissal_attempted();
            }
            self.return_to_rest()
        } else if progress > thresholds.progress || velocity > thresholds.velocity {
            let hint = if velocity > thresholds.velocity && thresholds.velocity > 0.0 {
                (velocity / thresholds.velocity).clamp(1.0, MAX_SPEED_HINT)
            } else {
                1.0
            };
            self.commit(hint)
        } else {
            self.return_to_rest()
        };
        self.finish_summary(decision);
        decision
    }

    fn commit(&mut self, speed_hint: f64) -> Decision {
        let bounces = self.guard.drag_ended();
        self.note_bounces(bounces);
        if let Some(session) = &mut self.session {
            session.drag = None;
        }
        let hint = if speed_hint.is_finite() {
            speed_hint.clamp(1.0, MAX_SPEED_HINT)
        } else {
            1.0
        };
        self.driver.finish(hint, AnimationTag::Dismiss);
        self.set_phase(Phase::AnimatedDismissing);
        self.trace_decision(Decision::Commit);
        Decision::Commit
    }

    /// Restores a pulled-down sheet, or settles one already at rest.
    fn return_to_rest(&mut self) -> Decision {
        let bounces = self.guard.drag_ended();
        self.note_bounces(bounces);
        let Some(session) = &mut self.session else {
            return Decision::Settle;
        };

        if session.progress > 0.0 {
            session.drag = Some(DragState::Restoring);
            let timing = if session.veto_active {
                session.config.veto_restore_timing
            } else {
                session.config.restore_timing
            };
            self.driver.cancel(timing, AnimationTag::Restore);
            self.trace_decision(Decision::Restore);
            Decision::Restore
        } else {
            session.drag = None;
            session.progress = 0.0;
            let rest = session.rest_snapshot();
            let superseded = self.driver.jump_to(rest);
            self.note_superseded(superseded);
            self.pending.frame_changed = true;
            self.policy.on_appearance(AppearanceEvent::Cancelled);
            self.set_phase(Phase::Presented);
            self.trace_decision(Decision::Settle);
            Decision::Settle
        }
    }

    // -- Animation bookkeeping ----------------------------------------------

    fn finish_animation(&mut self, completion: Completion) {
        self.note_completion(completion);
        match (completion.tag, self.phase) {
            (AnimationTag::Present, Phase::Presenting) => {
                self.set_phase(Phase::Presented);
                self.policy.on_appearance(AppearanceEvent::DidDisappear);
            }
            (AnimationTag::Dismiss, Phase::AnimatedDismissing) => {
                self.session = None;
                self.set_phase(Phase::Dismissed);
                self.policy.on_appearance(AppearanceEvent::DidAppear);
            }
            (AnimationTag::Restore, Phase::InteractiveDismissing) => {
                if let Some(session) = &mut self.session {
                    session.drag = None;
                    session.progress = 0.0;
                }
                self.set_phase(Phase::Presented);
                self.policy.on_appearance(AppearanceEvent::Cancelled);
            }
            _ => {}
        }
    }

    fn start_animation(&mut self, to: SheetFrame, duration: Duration, tag: AnimationTag) {
        let easing = self
            .session
            .as_ref()
            .map_or_else(Easing::default, |session| easing_for(&session.config));
        let superseded = self.driver.animate(to, duration, easing, tag);
        self.note_superseded(superseded);
        self.pending.frame_changed = true;
    }

    fn full_duration(&self, session: &TransitionSession) -> Duration {
        Duration::from_secs_f64(session.config.duration, self.timebase)
    }

    fn note_started(&mut self, request: AnimationRequest) {
        self.pending.started = Some(request);
        self.pending.frame_changed = true;
        let e = AnimationStartEvent {
            at: request.start,
            tag: request.tag,
            duration: request.duration,
        };
        self.tracer().animation_start(&e);
    }

    fn note_superseded(&mut self, superseded: Option<Completion>) {
        if let Some(completion) = superseded {
            self.note_completion(completion);
        }
    }

    fn note_completion(&mut self, completion: Completion) {
        self.pending.completed.push(completion);
        let e = AnimationEndEvent {
            at: self.now,
            tag: completion.tag,
            finished: completion.finished,
        };
        self.tracer().animation_end(&e);
    }

    fn note_bounces(&mut self, bounces: Option<bool>) {
        if bounces.is_some() {
            self.pending.scroll_bounces = bounces;
        }
    }

    // -- Tracing ------------------------------------------------------------

    fn tracer(&mut self) -> Tracer<'_> {
        Tracer::new(&mut self.sink)
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        self.pending.phase = Some(to);
        let e = PhaseChangeEvent {
            at: self.now,
            from,
            to,
        };
        self.tracer().phase_change(&e);
    }

    fn ignored(&mut self, call: CallKind) -> bool {
        let e = IgnoredCallEvent {
            at: self.now,
            call,
            phase: self.phase,
        };
        self.tracer().ignored_call(&e);
        false
    }

    fn record_gesture(&mut self, sample: GestureSample, translation: &DragTranslation) {
        let e = GestureEvent {
            at: self.now,
            phase: sample.phase,
            translation_y: sample.translation_y,
            velocity_y: sample.velocity_y,
            progress: translation.progress,
            resisted: translation.resisted,
        };
        if let Some(summary) = &mut self.summary {
            summary.record(&e);
        }
        self.tracer().gesture(&e);
    }

    fn trace_decision(&mut self, decision: Decision) {
        let Some(session) = &self.session else {
            return;
        };
        let duration = match decision {
            Decision::Settle => Duration::ZERO,
            Decision::Commit | Decision::Restore => self
                .driver
                .active_animation()
                .map_or(Duration::ZERO, |request| request.duration),
        };
        let e = DecisionEvent {
            at: self.now,
            decision,
            progress: session.progress,
            velocity: session.last_drag_velocity,
            veto_active: session.veto_active,
            duration,
        };
        self.tracer().decision(&e);
    }

    fn finish_summary(&mut self, decision: Decision) {
        if let Some(builder) = self.summary.take() {
            let summary = builder.finish(self.now, decision);
            self.tracer().gesture_summary(&summary);
        }
    }
}

fn easing_for(config: &TransitionConfig) -> Easing {
    Easing::Spring(SpringTiming::new(
        config.damping_ratio,
        config.initial_velocity,
        config.duration,
    ))
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

impl<P: SheetPolicy, S: TraceSink> PhaseDriver for SheetTransition<P, S> {
    fn begin_presentation(&mut self, config: TransitionConfig, layout: SheetLayout) -> bool {
        Self::begin_presentation(self, config, layout)
    }

    fn begin_dismissal(&mut self, programmatic: bool) -> bool {
        Self::begin_dismissal(self, programmatic)
    }

    fn advance(&mut self, now: HostTime) -> SheetChanges {
        Self::advance(self, now)
    }

    fn on_animation_completed(&mut self, tag: AnimationTag, finished: bool) -> bool {
        Self::on_animation_completed(self, tag, finished)
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}

impl<P: SheetPolicy, S: TraceSink> PercentDrivenTransition for SheetTransition<P, S> {
    fn begin(&mut self) -> bool {
        self.begin_dismissal(false)
    }

    fn update(&mut self, percent: f64) -> bool {
        if !self.is_tracking() {
            return self.ignored(CallKind::ScrubUpdate);
        }
        self.scrub_to(percent);
        true
    }

    fn finish(&mut self, speed_hint: f64) -> bool {
        if !self.is_tracking() {
            return self.ignored(CallKind::ScrubFinish);
        }
        let decision = self.commit(speed_hint);
        self.finish_summary(decision);
        true
    }

    fn cancel(&mut self) -> bool {
        self.cancel_interactive_dismissal()
    }

    fn percent_complete(&self) -> f64 {
        if self.phase == Phase::InteractiveDismissing {
            self.session.as_ref().map_or(0.0, |session| session.progress)
        } else {
            0.0
        }
    }
}

impl<P: SheetPolicy, S: TraceSink> GestureGate for SheetTransition<P, S> {
    fn should_begin(&self, touch: Point) -> bool {
        let interaction_enabled = self
            .session
            .as_ref()
            .is_some_and(|session| session.config.interaction_enabled);
        self.phase == Phase::Presented && interaction_enabled && self.guard.should_begin(touch)
    }

    fn should_recognize_simultaneously(&self) -> bool {
        self.guard.should_recognize_simultaneously()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
