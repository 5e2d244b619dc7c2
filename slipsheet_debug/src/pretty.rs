// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use slipsheet_core::time::{HostTime, Timebase};
use slipsheet_core::trace::{
    AnimationEndEvent, AnimationStartEvent, DecisionEvent, GestureEvent, GestureSummary,
    IgnoredCallEvent, PhaseChangeEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_ms(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1_000_000.0
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.ticks_to_ms(t.ticks())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[phase] {:.3}ms {} -> {}",
            self.host_ms(e.at),
            e.from.as_str(),
            e.to.as_str(),
        );
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        let resisted = if e.resisted { " resisted" } else { "" };
        let _ = writeln!(
            self.writer,
            "[drag] {:.3}ms {:?} dy={:.1} v={:.1} progress={:.3}{resisted}",
            self.host_ms(e.at),
            e.phase,
            e.translation_y,
            e.velocity_y,
            e.progress,
        );
    }

    fn on_decision(&mut self, e: &DecisionEvent) {
        let veto = if e.veto_active { " vetoed" } else { "" };
        let _ = writeln!(
            self.writer,
            "[decide] {:.3}ms {} progress={:.3} v={:.1} anim={:.3}ms{veto}",
            self.host_ms(e.at),
            e.decision.as_str(),
            e.progress,
            e.velocity,
            self.ticks_to_ms(e.duration.ticks()),
        );
    }

    fn on_animation_start(&mut self, e: &AnimationStartEvent) {
        let _ = writeln!(
            self.writer,
            "[anim:start] {:.3}ms {} for {:.3}ms",
            self.host_ms(e.at),
            e.tag.as_str(),
            self.ticks_to_ms(e.duration.ticks()),
        );
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        let status = if e.finished { "finished" } else { "superseded" };
        let _ = writeln!(
            self.writer,
            "[anim:end] {:.3}ms {} {status}",
            self.host_ms(e.at),
            e.tag.as_str(),
        );
    }

    fn on_ignored_call(&mut self, e: &IgnoredCallEvent) {
        let _ = writeln!(
            self.writer,
            "[ignored] {:.3}ms {} in {}",
            self.host_ms(e.at),
            e.call.as_str(),
            e.phase.as_str(),
        );
    }

    fn on_gesture_summary(&mut self, s: &GestureSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] drag {:.3}ms samples={} peak={:.3} peak_v={:.1} resisted={} veto={} -> {}",
            self.ticks_to_ms(s.ended.saturating_duration_since(s.began).ticks()),
            s.samples,
            s.peak_progress,
            s.peak_velocity,
            s.resisted,
            s.veto_active,
            s.decision.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipsheet_core::session::Phase;
    use slipsheet_core::time::Duration;
    use slipsheet_core::trace::Decision;

    #[test]
    fn pretty_print_phase_change() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_phase_change(&PhaseChangeEvent {
            at: HostTime(2_000_000),
            from: Phase::Presenting,
            to: Phase::Presented,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[phase]"), "got: {output}");
        assert!(output.contains("presenting -> presented"), "got: {output}");
        assert!(output.contains("2.000ms"), "got: {output}");
    }

    #[test]
    fn pretty_print_decision() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_decision(&DecisionEvent {
            at: HostTime(0),
            decision: Decision::Restore,
            progress: 0.25,
            velocity: 120.0,
            veto_active: true,
            duration: Duration(130_000_000),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("restore"), "got: {output}");
        assert!(output.contains("anim=130.000ms"), "got: {output}");
        assert!(output.contains("vetoed"), "got: {output}");
    }
}
