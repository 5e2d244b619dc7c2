// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Floats are stored as their IEEE-754
//! bit patterns.

use slipsheet_core::driver::AnimationTag;
use slipsheet_core::gesture::GesturePhase;
use slipsheet_core::session::Phase;
use slipsheet_core::time::{Duration, HostTime};
use slipsheet_core::trace::{
    AnimationEndEvent, AnimationStartEvent, CallKind, Decision, DecisionEvent, GestureEvent,
    GestureSummary, IgnoredCallEvent, PhaseChangeEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PHASE_CHANGE: u8 = 1;
const TAG_GESTURE: u8 = 2;
const TAG_DECISION: u8 = 3;
const TAG_ANIMATION_START: u8 = 4;
const TAG_ANIMATION_END: u8 = 5;
const TAG_IGNORED_CALL: u8 = 6;
const TAG_GESTURE_SUMMARY: u8 = 7;

// ---------------------------------------------------------------------------
// Enum codes
// ---------------------------------------------------------------------------

const PHASES: [Phase; 6] = [
    Phase::Idle,
    Phase::Presenting,
    Phase::Presented,
    Phase::InteractiveDismissing,
    Phase::AnimatedDismissing,
    Phase::Dismissed,
];

const GESTURE_PHASES: [GesturePhase; 5] = [
    GesturePhase::Began,
    GesturePhase::Changed,
    GesturePhase::Ended,
    GesturePhase::Cancelled,
    GesturePhase::Failed,
];

const DECISIONS: [Decision; 3] = [Decision::Commit, Decision::Restore, Decision::Settle];

const TAGS: [AnimationTag; 3] = [
    AnimationTag::Present,
    AnimationTag::Dismiss,
    AnimationTag::Restore,
];

const CALLS: [CallKind; 9] = [
    CallKind::BeginPresentation,
    CallKind::BeginDismissal,
    CallKind::GestureSample,
    CallKind::CancelInteractive,
    CallKind::BackgroundTap,
    CallKind::AnimationCompleted,
    CallKind::Reset,
    CallKind::ScrubUpdate,
    CallKind::ScrubFinish,
];

/// Position of `value` in `table`, as a one-byte code.
#[expect(
    clippy::cast_possible_truncation,
    reason = "code tables hold fewer than 256 entries"
)]
fn code_of<T: PartialEq>(table: &[T], value: &T) -> u8 {
    table.iter().position(|v| v == value).unwrap_or(0) as u8
}

fn from_code<T: Copy>(table: &[T], code: u8) -> Option<T> {
    table.get(usize::from(code)).copied()
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_phase(&mut self, p: Phase) {
        self.write_u8(code_of(&PHASES, &p));
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        self.write_u8(TAG_PHASE_CHANGE);
        self.write_u64(e.at.ticks());
        self.write_phase(e.from);
        self.write_phase(e.to);
    }

    fn on_gesture(&mut self, e: &GestureEvent) {
        self.write_u8(TAG_GESTURE);
        self.write_u64(e.at.ticks());
        self.write_u8(code_of(&GESTURE_PHASES, &e.phase));
        self.write_f64(e.translation_y);
        self.write_f64(e.velocity_y);
        self.write_f64(e.progress);
        self.write_bool(e.resisted);
    }

    fn on_decision(&mut self, e: &DecisionEvent) {
        self.write_u8(TAG_DECISION);
        self.write_u64(e.at.ticks());
        self.write_u8(code_of(&DECISIONS, &e.decision));
        self.write_f64(e.progress);
        self.write_f64(e.velocity);
        self.write_bool(e.veto_active);
        self.write_u64(e.duration.ticks());
    }

    fn on_animation_start(&mut self, e: &AnimationStartEvent) {
        self.write_u8(TAG_ANIMATION_START);
        self.write_u64(e.at.ticks());
        self.write_u8(code_of(&TAGS, &e.tag));
        self.write_u64(e.duration.ticks());
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        self.write_u8(TAG_ANIMATION_END);
        self.write_u64(e.at.ticks());
        self.write_u8(code_of(&TAGS, &e.tag));
        self.write_bool(e.finished);
    }

    fn on_ignored_call(&mut self, e: &IgnoredCallEvent) {
        self.write_u8(TAG_IGNORED_CALL);
        self.write_u64(e.at.ticks());
        self.write_u8(code_of(&CALLS, &e.call));
        self.write_phase(e.phase);
    }

    fn on_gesture_summary(&mut self, s: &GestureSummary) {
        self.write_u8(TAG_GESTURE_SUMMARY);
        self.write_u64(s.began.ticks());
        self.write_u64(s.ended.ticks());
        self.write_u32(s.samples);
        self.write_f64(s.peak_progress);
        self.write_f64(s.peak_velocity);
        self.write_bool(s.resisted);
        self.write_bool(s.veto_active);
        self.write_u8(code_of(&DECISIONS, &s.decision));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PhaseChangeEvent`].
    PhaseChange(PhaseChangeEvent),
    /// A [`GestureEvent`].
    Gesture(GestureEvent),
    /// A [`DecisionEvent`].
    Decision(DecisionEvent),
    /// An [`AnimationStartEvent`].
    AnimationStart(AnimationStartEvent),
    /// An [`AnimationEndEvent`].
    AnimationEnd(AnimationEndEvent),
    /// An [`IgnoredCallEvent`].
    IgnoredCall(IgnoredCallEvent),
    /// A [`GestureSummary`].
    GestureSummary(GestureSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_phase(&mut self) -> Option<Phase> {
        from_code(&PHASES, self.read_u8()?)
    }

    fn read_decision(&mut self) -> Option<Decision> {
        from_code(&DECISIONS, self.read_u8()?)
    }

    fn read_tag(&mut self) -> Option<AnimationTag> {
        from_code(&TAGS, self.read_u8()?)
    }

    fn decode_phase_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseChange(PhaseChangeEvent {
            at: self.read_time()?,
            from: self.read_phase()?,
            to: self.read_phase()?,
        }))
    }

    fn decode_gesture(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Gesture(GestureEvent {
            at: self.read_time()?,
            phase: from_code(&GESTURE_PHASES, self.read_u8()?)?,
            translation_y: self.read_f64()?,
            velocity_y: self.read_f64()?,
            progress: self.read_f64()?,
            resisted: self.read_bool()?,
        }))
    }

    fn decode_decision(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Decision(DecisionEvent {
            at: self.read_time()?,
            decision: self.read_decision()?,
            progress: self.read_f64()?,
            velocity: self.read_f64()?,
            veto_active: self.read_bool()?,
            duration: Duration(self.read_u64()?),
        }))
    }

    fn decode_animation_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AnimationStart(AnimationStartEvent {
            at: self.read_time()?,
            tag: self.read_tag()?,
            duration: Duration(self.read_u64()?),
        }))
    }

    fn decode_animation_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AnimationEnd(AnimationEndEvent {
            at: self.read_time()?,
            tag: self.read_tag()?,
            finished: self.read_bool()?,
        }))
    }

    fn decode_ignored_call(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::IgnoredCall(IgnoredCallEvent {
            at: self.read_time()?,
            call: from_code(&CALLS, self.read_u8()?)?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_gesture_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::GestureSummary(GestureSummary {
            began: self.read_time()?,
            ended: self.read_time()?,
            samples: self.read_u32()?,
            peak_progress: self.read_f64()?,
            peak_velocity: self.read_f64()?,
            resisted: self.read_bool()?,
            veto_active: self.read_bool()?,
            decision: self.read_decision()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PHASE_CHANGE => self.decode_phase_change(),
            TAG_GESTURE => self.decode_gesture(),
            TAG_DECISION => self.decode_decision(),
            TAG_ANIMATION_START => self.decode_animation_start(),
            TAG_ANIMATION_END => self.decode_animation_end(),
            TAG_IGNORED_CALL => self.decode_ignored_call(),
            TAG_GESTURE_SUMMARY => self.decode_gesture_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_decision_fields() {
        let mut rec = RecorderSink::new();
        rec.on_decision(&DecisionEvent {
            at: HostTime(42),
            decision: Decision::Restore,
            progress: 0.158,
            velocity: -12.5,
            veto_active: true,
            duration: Duration(82_000_000),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Decision(e) => {
                assert_eq!(e.at, HostTime(42));
                assert_eq!(e.decision, Decision::Restore);
                assert_eq!(e.progress, 0.158);
                assert_eq!(e.velocity, -12.5);
                assert!(e.veto_active);
                assert_eq!(e.duration, Duration(82_000_000));
            }
            other => panic!("expected Decision, got {other:?}"),
        }
    }

    #[test]
    fn records_a_session_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_phase_change(&PhaseChangeEvent {
            at: HostTime(0),
            from: Phase::Idle,
            to: Phase::Presenting,
        });
        rec.on_animation_start(&AnimationStartEvent {
            at: HostTime(0),
            tag: AnimationTag::Present,
            duration: Duration(520),
        });
        rec.on_gesture(&GestureEvent {
            at: HostTime(600),
            phase: GesturePhase::Changed,
            translation_y: 120.0,
            velocity_y: 300.0,
            progress: 0.2,
            resisted: false,
        });
        rec.on_ignored_call(&IgnoredCallEvent {
            at: HostTime(700),
            call: CallKind::BeginDismissal,
            phase: Phase::InteractiveDismissing,
        });
        rec.on_animation_end(&AnimationEndEvent {
            at: HostTime(800),
            tag: AnimationTag::Restore,
            finished: false,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            RecordedEvent::PhaseChange(PhaseChangeEvent {
                to: Phase::Presenting,
                ..
            })
        ));
        assert!(matches!(events[1], RecordedEvent::AnimationStart(_)));
        assert!(matches!(
            events[2],
            RecordedEvent::Gesture(GestureEvent {
                phase: GesturePhase::Changed,
                ..
            })
        ));
        assert!(matches!(
            events[3],
            RecordedEvent::IgnoredCall(IgnoredCallEvent {
                call: CallKind::BeginDismissal,
                phase: Phase::InteractiveDismissing,
                ..
            })
        ));
        assert!(matches!(
            events[4],
            RecordedEvent::AnimationEnd(AnimationEndEvent {
                tag: AnimationTag::Restore,
                finished: false,
                ..
            })
        ));
    }

    #[test]
    fn records_gesture_summary() {
        let mut rec = RecorderSink::new();
        rec.on_gesture_summary(&GestureSummary {
            began: HostTime(100),
            ended: HostTime(400),
            samples: 12,
            peak_progress: 0.6,
            peak_velocity: 1_450.0,
            resisted: false,
            veto_active: false,
            decision: Decision::Commit,
        });
        let Some(RecordedEvent::GestureSummary(s)) = decode(rec.as_bytes()).next() else {
            panic!("expected a gesture summary");
        };
        assert_eq!(s.samples, 12);
        assert_eq!(s.peak_velocity, 1_450.0);
        assert_eq!(s.decision, Decision::Commit);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_animation_start(&AnimationStartEvent {
            at: HostTime(1),
            tag: AnimationTag::Dismiss,
            duration: Duration(2),
        });
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert!(events.is_empty());
    }
}
