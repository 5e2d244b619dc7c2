// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted sheet sessions that exercise the tracing and diagnostics pipeline.
//!
//! Presents a sheet, drags it past the dismissal threshold, and flicks it
//! away; then presents a second sheet whose policy refuses dismissal and
//! drags against the resistance. Events go to both a
//! [`PrettyPrintSink`](slipsheet_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](slipsheet_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file. Each session is also
//! replayed into a small [`SheetPresenter`] that stands in for a view tree.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use slipsheet_core::config::TransitionConfig;
use slipsheet_core::driver::SheetFrame;
use slipsheet_core::host::SheetPresenter;
use slipsheet_core::machine::{SheetChanges, SheetTransition};
use slipsheet_core::policy::{AllowDismiss, SheetPolicy};
use slipsheet_core::session::SheetLayout;
use slipsheet_core::time::Timebase;
use slipsheet_core::trace::{
    AnimationEndEvent, AnimationStartEvent, DecisionEvent, GestureEvent, GestureSummary,
    IgnoredCallEvent, PhaseChangeEvent, TraceSink,
};

use slipsheet_debug::pretty::PrettyPrintSink;
use slipsheet_debug::recorder::RecorderSink;
use slipsheet_harness::{ContinuityTracker, DragScript, Playback};

const REFRESH_HZ: f64 = 60.0;
const CONTAINER: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);
const SHEET_HEIGHT: f64 = 420.0;

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        self.pretty.on_phase_change(e);
        self.recorder.on_phase_change(e);
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        self.pretty.on_gesture(e);
        self.recorder.on_gesture(e);
    }

    fn on_decision(&mut self, e: &DecisionEvent) {
        self.pretty.on_decision(e);
        self.recorder.on_decision(e);
    }

    fn on_animation_start(&mut self, e: &AnimationStartEvent) {
        self.pretty.on_animation_start(e);
        self.recorder.on_animation_start(e);
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        self.pretty.on_animation_end(e);
        self.recorder.on_animation_end(e);
    }

    fn on_ignored_call(&mut self, e: &IgnoredCallEvent) {
        self.pretty.on_ignored_call(e);
        self.recorder.on_ignored_call(e);
    }

    fn on_gesture_summary(&mut self, s: &GestureSummary) {
        self.pretty.on_gesture_summary(s);
        self.recorder.on_gesture_summary(s);
    }
}

/// Stands in for a view tree: keeps what was last drawn and counts redraws.
#[derive(Default)]
struct Stage {
    drawn: Option<SheetFrame>,
    redraws: u32,
    animations: u32,
}

impl SheetPresenter for Stage {
    fn apply(&mut self, frame: &SheetFrame, changes: &SheetChanges) {
        if changes.frame_changed || self.drawn.is_none() {
            self.drawn = Some(*frame);
            self.redraws += 1;
        }
        if let Some(request) = changes.started {
            self.animations += 1;
            println!(
                "stage: {} over {:.0} ms",
                request.tag.as_str(),
                request.duration.as_secs_f64(Timebase::NANOS) * 1000.0,
            );
        }
    }
}

/// A policy that refuses every dismissal, like a sheet with unsaved edits.
struct Locked {
    attempts: u32,
}

impl SheetPolicy for Locked {
    fn may_dismiss(&self) -> bool {
        false
    }

    fn on_dismissal_attempted(&mut self) {
        self.attempts += 1;
    }
}

fn main() {
    let timebase = Timebase::NANOS;
    let layout = SheetLayout::new(CONTAINER, SHEET_HEIGHT);
    let mut recording = Vec::new();

    // -- session 1: flick to dismiss ----------------------------------------
    let sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        recorder: RecorderSink::new(),
    };
    let sheet = SheetTransition::with_trace_sink(AllowDismiss, timebase, sink);
    let mut playback = Playback::new(sheet, REFRESH_HZ);

    playback
        .sheet_mut()
        .begin_presentation(TransitionConfig::new(), layout);
    playback.run_until_settled(120);

    let flick = DragScript::new(playback.frame_secs())
        .wait(10)
        .began()
        .drag_to(190.0, 12)
        .release(1_400.0);
    playback.run(&flick);
    playback.run_until_settled(120);
    // A second dismissal is refused and shows up as an ignored call.
    playback.sheet_mut().begin_dismissal(true);

    let mut stage = Stage::default();
    playback.replay(&mut stage);
    println!(
        "stage: {} redraws, {} animations",
        stage.redraws, stage.animations
    );

    let mut continuity = ContinuityTracker::new(SHEET_HEIGHT * 0.25);
    let report = continuity.observe_all(playback.records());
    println!(
        "session 1: {} frames, max step {:.1}pt, {}",
        report.total_frames,
        report.max_jump,
        report.grade.as_str(),
    );

    let (sheet, _) = playback.into_parts();
    recording.extend_from_slice(sheet.trace_sink().recorder.as_bytes());
    let last_tick = sheet.now();

    // -- session 2: dismissal refused ---------------------------------------
    let sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout()), timebase),
        recorder: RecorderSink::new(),
    };
    let mut sheet = SheetTransition::with_trace_sink(Locked { attempts: 0 }, timebase, sink);
    // Continue the timeline where the first session stopped.
    sheet.advance(last_tick);
    let mut playback = Playback::new(sheet, REFRESH_HZ);

    playback
        .sheet_mut()
        .begin_presentation(TransitionConfig::page_sheet(), layout);
    playback.run_until_settled(120);

    let tug = DragScript::new(playback.frame_secs())
        .wait(6)
        .began()
        .drag_to(320.0, 20)
        .release(600.0);
    playback.run(&tug);
    playback.run_until_settled(120);
    playback.sheet_mut().on_background_tap();

    let mut stage = Stage::default();
    playback.replay(&mut stage);
    if let Some(drawn) = stage.drawn {
        println!(
            "stage: back at y={:.0} with overlay {:.2}",
            drawn.sheet.y0, drawn.overlay_opacity
        );
    }

    let (sheet, records) = playback.into_parts();
    let mut continuity = ContinuityTracker::new(SHEET_HEIGHT * 0.25);
    let report = continuity.observe_all(&records);
    println!(
        "session 2: {} frames, max step {:.1}pt, {}, {} refused attempt(s)",
        report.total_frames,
        report.max_jump,
        report.grade.as_str(),
        sheet.policy().attempts,
    );
    recording.extend_from_slice(sheet.trace_sink().recorder.as_bytes());

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    slipsheet_debug::chrome::export(&recording, timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path}");
}
