// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Lifecycle phases become nested slices on thread 0, animations become
//! complete events on thread 1, and drag progress is exported as a counter
//! track.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use slipsheet_core::session::Phase;
use slipsheet_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

const PHASE_TID: u32 = 0;
const ANIMATION_TID: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PhaseChange(e) => {
                let ts = ticks_to_us(e.at.ticks(), timebase);
                // Idle and Dismissed are resting states, not slices.
                if has_slice(e.from) {
                    events.push(json!({
                        "ph": "E",
                        "name": e.from.as_str(),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": PHASE_TID,
                    }));
                }
                if has_slice(e.to) {
                    events.push(json!({
                        "ph": "B",
                        "name": e.to.as_str(),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": PHASE_TID,
                        "args": {
                            "from": e.from.as_str(),
                        }
                    }));
                }
            }
            RecordedEvent::Gesture(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "DragProgress",
                    "cat": "Gesture",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": PHASE_TID,
                    "args": {
                        "progress": e.progress,
                    }
                }));
            }
            RecordedEvent::Decision(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": e.decision.as_str(),
                    "cat": "Decision",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": PHASE_TID,
                    "s": "t",
                    "args": {
                        "progress": e.progress,
                        "velocity": e.velocity,
                        "veto_active": e.veto_active,
                        "duration_us": ticks_to_us(e.duration.ticks(), timebase),
                    }
                }));
            }
            RecordedEvent::AnimationStart(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": e.tag.as_str(),
                    "cat": "Animation",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "dur": ticks_to_us(e.duration.ticks(), timebase),
                    "pid": 0,
                    "tid": ANIMATION_TID,
                }));
            }
            RecordedEvent::AnimationEnd(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.finished { "AnimationFinished" } else { "AnimationSuperseded" },
                    "cat": "Animation",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": ANIMATION_TID,
                    "s": "t",
                    "args": {
                        "tag": e.tag.as_str(),
                    }
                }));
            }
            RecordedEvent::IgnoredCall(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "IgnoredCall",
                    "cat": "Lifecycle",
                    "ts": ticks_to_us(e.at.ticks(), timebase),
                    "pid": 0,
                    "tid": PHASE_TID,
                    "s": "t",
                    "args": {
                        "call": e.call.as_str(),
                        "phase": e.phase.as_str(),
                    }
                }));
            }
            RecordedEvent::GestureSummary(s) => {
                events.push(json!({
                    "ph": "X",
                    "name": "Drag",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.began.ticks(), timebase),
                    "dur": ticks_to_us(s.ended.saturating_duration_since(s.began).ticks(), timebase),
                    "pid": 0,
                    "tid": PHASE_TID,
                    "args": {
                        "samples": s.samples,
                        "peak_progress": s.peak_progress,
                        "peak_velocity": s.peak_velocity,
                        "resisted": s.resisted,
                        "veto_active": s.veto_active,
                        "decision": s.decision.as_str(),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn has_slice(phase: Phase) -> bool {
    !matches!(phase, Phase::Idle | Phase::Dismissed)
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
