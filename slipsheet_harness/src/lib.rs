// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless playback and continuity grading for sheet transitions.
//!
//! A [`DragScript`] lays out drag samples on a frame grid, [`Playback`]
//! drives a [`SheetTransition`] through them at a fixed refresh rate, and
//! [`ContinuityTracker`] grades the recorded frames for visible snaps.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use slipsheet_core::driver::SheetFrame;
use slipsheet_core::gesture::GestureSample;
use slipsheet_core::host::SheetPresenter;
use slipsheet_core::machine::{GestureOutcome, SheetChanges, SheetTransition};
use slipsheet_core::policy::SheetPolicy;
use slipsheet_core::session::Phase;
use slipsheet_core::time::{Duration, HostTime};
use slipsheet_core::trace::TraceSink;

// ---------------------------------------------------------------------------
// DragScript
// ---------------------------------------------------------------------------

/// One scripted sample, delivered after the frame's animation tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptStep {
    /// Frame offset from the start of playback.
    pub frame: u32,
    /// The sample to deliver.
    pub sample: GestureSample,
}

/// A drag laid out frame by frame, at most one sample per frame.
#[derive(Clone, Debug)]
pub struct DragScript {
    frame_secs: f64,
    steps: Vec<ScriptStep>,
    cursor: u32,
    translation: f64,
}

impl DragScript {
    /// Creates an empty script for a display refreshing every `frame_secs`.
    #[must_use]
    pub fn new(frame_secs: f64) -> Self {
        Self {
            frame_secs,
            steps: Vec::new(),
            cursor: 0,
            translation: 0.0,
        }
    }

    /// Idles for `frames` frames.
    #[must_use]
    pub fn wait(mut self, frames: u32) -> Self {
        self.cursor = self.cursor.saturating_add(frames);
        self
    }

    /// Touches down.
    #[must_use]
    pub fn began(mut self) -> Self {
        self.translation = 0.0;
        self.push(GestureSample::began());
        self
    }

    /// Moves linearly to `translation` over `over` frames.
    #[must_use]
    pub fn drag_to(mut self, translation: f64, over: u32) -> Self {
        let over = over.max(1);
        let start = self.translation;
        let per_frame = (translation - start) / f64::from(over);
        let velocity = if self.frame_secs > 0.0 {
            per_frame / self.frame_secs
        } else {
            0.0
        };
        for i in 1..=over {
            let t = start + per_frame * f64::from(i);
            self.push(GestureSample::changed(t, velocity));
        }
        self.translation = translation;
        self
    }

    /// Lifts the finger at the current translation with `velocity`.
    #[must_use]
    pub fn release(mut self, velocity: f64) -> Self {
        self.push(GestureSample::ended(self.translation, velocity));
        self
    }

    /// Cancels the drag at the current translation.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.push(GestureSample::cancelled(self.translation));
        self
    }

    /// Scripted steps in frame order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Number of frames the script spans.
    #[must_use]
    pub fn len_frames(&self) -> u32 {
        self.cursor
    }

    fn push(&mut self, sample: GestureSample) {
        self.steps.push(ScriptStep {
            frame: self.cursor,
            sample,
        });
        self.cursor = self.cursor.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// The machine's state after one played frame.
#[derive(Clone, Debug)]
pub struct FrameRecord {
    /// Frame counter since the playback was created.
    pub index: u32,
    /// Host time of the frame.
    pub at: HostTime,
    /// Phase after input was delivered.
    pub phase: Phase,
    /// Everything the host draws, after input was delivered.
    pub frame: SheetFrame,
    /// Output of the frame's `advance`.
    pub changes: SheetChanges,
    /// What the machine did with this frame's scripted sample, if any.
    pub outcome: Option<GestureOutcome>,
}

/// Drives a [`SheetTransition`] at a fixed refresh interval.
#[derive(Debug)]
pub struct Playback<P: SheetPolicy, S: TraceSink> {
    sheet: SheetTransition<P, S>,
    interval: Duration,
    now: HostTime,
    frame: u32,
    records: Vec<FrameRecord>,
}

impl<P: SheetPolicy, S: TraceSink> Playback<P, S> {
    /// Wraps `sheet`, ticking at `refresh_hz` from the machine's current time.
    #[must_use]
    pub fn new(sheet: SheetTransition<P, S>, refresh_hz: f64) -> Self {
        let secs = if refresh_hz.is_finite() && refresh_hz > 0.0 {
            1.0 / refresh_hz
        } else {
            1.0 / 60.0
        };
        let interval = Duration::from_secs_f64(secs, sheet.timebase());
        let now = sheet.now();
        Self {
            sheet,
            interval,
            now,
            frame: 0,
            records: Vec::new(),
        }
    }

    /// Seconds between frames, for building a matching [`DragScript`].
    #[must_use]
    pub fn frame_secs(&self) -> f64 {
        self.interval.as_secs_f64(self.sheet.timebase())
    }

    /// The driven machine.
    #[must_use]
    pub fn sheet(&self) -> &SheetTransition<P, S> {
        &self.sheet
    }

    /// The driven machine, for calls between frames.
    pub fn sheet_mut(&mut self) -> &mut SheetTransition<P, S> {
        &mut self.sheet
    }

    /// Every frame played so far.
    #[must_use]
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Plays one frame with no input.
    pub fn step(&mut self) -> &FrameRecord {
        self.play_frame(None)
    }

    /// Plays `script` from the next frame, one frame per script frame.
    pub fn run(&mut self, script: &DragScript) {
        let mut steps = script.steps().iter().peekable();
        for offset in 0..script.len_frames() {
            let sample = steps
                .next_if(|step| step.frame == offset)
                .map(|step| step.sample);
            self.play_frame(sample);
        }
    }

    /// Plays frames until the sheet rests, up to `max_frames`.
    ///
    /// Returns `true` once the phase is idle, presented, or dismissed.
    pub fn run_until_settled(&mut self, max_frames: u32) -> bool {
        for _ in 0..max_frames {
            if self.step().changes.is_empty() && is_resting(self.sheet.phase()) {
                return true;
            }
        }
        is_resting(self.sheet.phase())
    }

    /// Applies every recorded frame to `presenter`, in order.
    pub fn replay(&self, presenter: &mut impl SheetPresenter) {
        for record in &self.records {
            presenter.apply(&record.frame, &record.changes);
        }
    }

    /// Returns the machine and the recorded frames.
    pub fn into_parts(self) -> (SheetTransition<P, S>, Vec<FrameRecord>) {
        (self.sheet, self.records)
    }

    fn play_frame(&mut self, sample: Option<GestureSample>) -> &FrameRecord {
        self.now = self.now + self.interval;
        let changes = self.sheet.advance(self.now);
        let outcome = sample.map(|sample| self.sheet.on_gesture_sample(sample));
        let frame = *self.sheet.sheet_frame();
        let record = FrameRecord {
            index: self.frame,
            at: self.now,
            phase: self.sheet.phase(),
            frame,
            changes,
            outcome,
        };
        self.frame = self.frame.saturating_add(1);
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
}

fn is_resting(phase: Phase) -> bool {
    matches!(phase, Phase::Idle | Phase::Presented | Phase::Dismissed)
}

// ---------------------------------------------------------------------------
// Continuity
// ---------------------------------------------------------------------------

/// How smoothly the sheet moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinuityGrade {
    /// Every step stayed under half the snap threshold.
    Smooth,
    /// No snaps, but some steps came close.
    Uneven,
    /// At least one step exceeded the snap threshold.
    Snapped,
}

impl ContinuityGrade {
    /// Returns a short label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Uneven => "uneven",
            Self::Snapped => "snapped",
        }
    }
}

/// Aggregated report returned by [`ContinuityTracker::observe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuityReport {
    /// Current grade.
    pub grade: ContinuityGrade,
    /// Largest vertical sheet movement between consecutive frames, in points.
    pub max_jump: f64,
    /// Largest overlay opacity change between consecutive frames.
    pub max_opacity_jump: f64,
    /// Steps larger than the snap threshold.
    pub snaps: u32,
    /// Total frames observed.
    pub total_frames: u64,
}

/// Measures frame-to-frame sheet movement.
///
/// Steps into or out of [`Phase::Idle`] are not measured: the sheet is not
/// on screen there and jumps freely.
#[derive(Clone, Debug)]
pub struct ContinuityTracker {
    snap_threshold: f64,
    previous: Option<(Phase, f64, f64)>,
    max_jump: f64,
    max_opacity_jump: f64,
    snaps: u32,
    total_frames: u64,
}

impl ContinuityTracker {
    /// Creates a tracker flagging steps larger than `snap_threshold` points.
    #[must_use]
    pub const fn new(snap_threshold: f64) -> Self {
        Self {
            snap_threshold,
            previous: None,
            max_jump: 0.0,
            max_opacity_jump: 0.0,
            snaps: 0,
            total_frames: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, record: &FrameRecord) -> ContinuityReport {
        self.total_frames = self.total_frames.saturating_add(1);
        let y = record.frame.sheet.y0;
        let opacity = record.frame.overlay_opacity;

        if let Some((phase, prev_y, prev_opacity)) = self.previous
            && phase != Phase::Idle
            && record.phase != Phase::Idle
        {
            let jump = (y - prev_y).abs();
            if jump > self.max_jump {
                self.max_jump = jump;
            }
            if jump > self.snap_threshold {
                self.snaps = self.snaps.saturating_add(1);
            }
            let opacity_jump = (opacity - prev_opacity).abs();
            if opacity_jump > self.max_opacity_jump {
                self.max_opacity_jump = opacity_jump;
            }
        }
        self.previous = Some((record.phase, y, opacity));

        self.report()
    }

    /// Observes every record in order and returns the final report.
    #[must_use]
    pub fn observe_all(&mut self, records: &[FrameRecord]) -> ContinuityReport {
        for record in records {
            _ = self.observe(record);
        }
        self.report()
    }

    fn report(&self) -> ContinuityReport {
        let grade = if self.snaps > 0 {
            ContinuityGrade::Snapped
        } else if self.max_jump > self.snap_threshold * 0.5 {
            ContinuityGrade::Uneven
        } else {
            ContinuityGrade::Smooth
        };
        ContinuityReport {
            grade,
            max_jump: self.max_jump,
            max_opacity_jump: self.max_opacity_jump,
            snaps: self.snaps,
            total_frames: self.total_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Affine, Rect};
    use slipsheet_core::config::TransitionConfig;
    use slipsheet_core::driver::AnimationTag;
    use slipsheet_core::policy::AllowDismiss;
    use slipsheet_core::session::SheetLayout;
    use slipsheet_core::time::Timebase;
    use slipsheet_core::trace::NoopSink;

    const CONTAINER: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

    fn presented() -> Playback<AllowDismiss, NoopSink> {
        let sheet = SheetTransition::new(AllowDismiss, Timebase::NANOS);
        let mut playback = Playback::new(sheet, 60.0);
        assert!(playback.sheet_mut().begin_presentation(
            TransitionConfig::new(),
            SheetLayout::new(CONTAINER, 400.0),
        ));
        assert!(playback.run_until_settled(240), "presentation never settled");
        assert_eq!(playback.sheet().phase(), Phase::Presented);
        playback
    }

    fn record(phase: Phase, y: f64) -> FrameRecord {
        FrameRecord {
            index: 0,
            at: HostTime(0),
            phase,
            frame: SheetFrame {
                sheet: Rect::new(0.0, y, 390.0, y + 400.0),
                overlay_opacity: 1.0,
                presenting_transform: Affine::IDENTITY,
            },
            changes: SheetChanges::default(),
            outcome: None,
        }
    }

    #[test]
    fn script_lays_out_one_sample_per_frame() {
        let script = DragScript::new(0.1).wait(2).began().drag_to(40.0, 4).release(900.0);
        assert_eq!(script.len_frames(), 8);
        let frames: Vec<u32> = script.steps().iter().map(|s| s.frame).collect();
        assert_eq!(frames, [2, 3, 4, 5, 6, 7]);

        // 10 points per frame at 10 frames per second.
        let first_move = script.steps()[1].sample;
        assert_eq!(first_move.translation_y, 10.0);
        assert!((first_move.velocity_y - 100.0).abs() < 1e-9);

        let last = script.steps()[5].sample;
        assert_eq!(last, GestureSample::ended(40.0, 900.0));
    }

    #[test]
    fn cancel_keeps_current_translation() {
        let script = DragScript::new(0.1).began().drag_to(25.0, 1).cancel();
        assert_eq!(script.steps()[2].sample, GestureSample::cancelled(25.0));
    }

    #[test]
    fn flick_past_threshold_dismisses_smoothly() {
        let mut playback = presented();
        let script = DragScript::new(playback.frame_secs())
            .began()
            .drag_to(300.0, 10)
            .release(1_200.0);
        playback.run(&script);
        assert!(playback.run_until_settled(240), "dismissal never settled");
        assert_eq!(playback.sheet().phase(), Phase::Dismissed);

        let mut tracker = ContinuityTracker::new(120.0);
        let report = tracker.observe_all(playback.records());
        assert_eq!(report.snaps, 0, "report: {report:?}");
        assert_ne!(report.grade, ContinuityGrade::Snapped);
    }

    #[test]
    fn short_drag_restores_to_rest() {
        let mut playback = presented();
        let rest = playback.sheet().current_frame();
        let script = DragScript::new(playback.frame_secs())
            .began()
            .drag_to(80.0, 8)
            .release(0.0);
        playback.run(&script);

        let tracked = playback.records().iter().filter(|r| {
            matches!(r.outcome, Some(GestureOutcome::Tracking(_)))
        });
        assert_eq!(tracked.count(), 8);

        assert!(playback.run_until_settled(240), "restore never settled");
        assert_eq!(playback.sheet().phase(), Phase::Presented);
        assert_eq!(playback.sheet().current_frame(), rest);
    }

    #[test]
    fn replay_applies_recorded_frames() {
        #[derive(Default)]
        struct Tops {
            applied: u32,
            moved: Vec<f64>,
            phases: Vec<Phase>,
        }

        impl SheetPresenter for Tops {
            fn apply(&mut self, frame: &SheetFrame, changes: &SheetChanges) {
                self.applied += 1;
                if changes.frame_changed {
                    self.moved.push(frame.sheet.y0);
                }
                if let Some(phase) = changes.phase {
                    self.phases.push(phase);
                }
            }
        }

        let playback = presented();
        let mut tops = Tops::default();
        playback.replay(&mut tops);
        assert_eq!(tops.applied as usize, playback.records().len());
        assert_eq!(tops.phases, [Phase::Presenting, Phase::Presented]);
        assert_eq!(tops.moved.first(), Some(&844.0), "slides in from the bottom edge");
        assert_eq!(tops.moved.last(), Some(&444.0), "ends at rest");
        assert!(
            tops.moved.windows(2).all(|w| w[1] <= w[0] + 1e-9),
            "moves up monotonically: {:?}",
            tops.moved
        );
    }

    #[test]
    fn early_native_completion_is_a_snap() {
        let sheet = SheetTransition::new(AllowDismiss, Timebase::NANOS);
        let mut playback = Playback::new(sheet, 60.0);
        assert!(playback.sheet_mut().begin_presentation(
            TransitionConfig::new(),
            SheetLayout::new(CONTAINER, 400.0),
        ));
        _ = playback.step();
        _ = playback.step();
        assert!(
            playback
                .sheet_mut()
                .on_animation_completed(AnimationTag::Present, true)
        );
        _ = playback.step();

        let mut tracker = ContinuityTracker::new(120.0);
        let report = tracker.observe_all(playback.records());
        assert_eq!(report.snaps, 1, "report: {report:?}");
        assert_eq!(report.grade, ContinuityGrade::Snapped);
    }

    #[test]
    fn idle_transitions_are_not_measured() {
        let mut tracker = ContinuityTracker::new(50.0);
        _ = tracker.observe(&record(Phase::Idle, 0.0));
        _ = tracker.observe(&record(Phase::Presenting, 844.0));
        let report = tracker.observe(&record(Phase::Presenting, 830.0));
        assert_eq!(report.snaps, 0);
        assert_eq!(report.max_jump, 14.0);
        assert_eq!(report.grade, ContinuityGrade::Smooth);
        assert_eq!(report.total_frames, 3);
    }

    #[test]
    fn grade_degrades_with_step_size() {
        let mut tracker = ContinuityTracker::new(50.0);
        _ = tracker.observe(&record(Phase::Presented, 444.0));
        let uneven = tracker.observe(&record(Phase::InteractiveDismissing, 480.0));
        assert_eq!(uneven.grade, ContinuityGrade::Uneven);
        let snapped = tracker.observe(&record(Phase::InteractiveDismissing, 600.0));
        assert_eq!(snapped.grade, ContinuityGrade::Snapped);
        assert_eq!(snapped.grade.as_str(), "snapped");
    }
}
