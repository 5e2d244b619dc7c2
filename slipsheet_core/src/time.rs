// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and timebase conversion.
//!
//! [`HostTime`] is a point in time expressed in the host's monotonic ticks
//! (display-link timestamps, `performance.now()` scaled to nanoseconds, and
//! so on). [`Timebase`] carries the rational ticks → nanoseconds factor, and
//! [`Duration`] is a span in the same tick units.
//!
//! Transition durations are configured in seconds (see
//! [`TransitionConfig`](crate::config::TransitionConfig)); the state machine
//! converts them to ticks once, with the timebase it was constructed with.

use core::fmt;
use core::ops::{Add, Sub};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// A point in time expressed as host monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Adds a duration, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `numer` or `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(numer != 0, "timebase numerator must not be zero");
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::NANOS
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts seconds to ticks.
    ///
    /// Negative, NaN, and infinite inputs produce [`Duration::ZERO`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating float-to-int cast of a finite, non-negative nanosecond count"
    )]
    pub fn from_secs_f64(secs: f64, timebase: Timebase) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        let nanos = (secs * NANOS_PER_SEC) as u64;
        Self(timebase.nanos_to_ticks(nanos))
    }

    /// Converts this duration to seconds.
    #[must_use]
    pub fn as_secs_f64(self, timebase: Timebase) -> f64 {
        timebase.ticks_to_nanos(self.0) as f64 / NANOS_PER_SEC
    }

    /// Scales the duration by a non-negative factor.
    ///
    /// Factors that are negative or non-finite produce [`Duration::ZERO`].
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating float-to-int cast of a scaled tick count"
    )]
    pub fn mul_f64(self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::ZERO;
        }
        Self((self.0 as f64 * factor) as u64)
    }

    /// Returns `elapsed / self` clamped to `[0, 1]`.
    ///
    /// A zero-length duration is always complete.
    #[must_use]
    pub fn fraction_elapsed(self, elapsed: Self) -> f64 {
        if self.0 == 0 {
            return 1.0;
        }
        (elapsed.0 as f64 / self.0 as f64).clamp(0.0, 1.0)
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_trip_identity_timebase() {
        let d = Duration::from_secs_f64(0.52, Timebase::NANOS);
        assert_eq!(d.ticks(), 520_000_000, "0.52s in nanosecond ticks");
        assert!((d.as_secs_f64(Timebase::NANOS) - 0.52).abs() < 1e-9);
    }

    #[test]
    fn seconds_with_coarse_timebase() {
        // 24 MHz ticks: 125/3 ns per tick.
        let tb = Timebase::new(125, 3);
        let d = Duration::from_secs_f64(1.0, tb);
        assert_eq!(d.ticks(), 24_000_000, "1s at 24 MHz");
    }

    #[test]
    fn degenerate_seconds_are_zero() {
        assert_eq!(Duration::from_secs_f64(-1.0, Timebase::NANOS), Duration::ZERO);
        assert_eq!(Duration::from_secs_f64(f64::NAN, Timebase::NANOS), Duration::ZERO);
        assert_eq!(
            Duration::from_secs_f64(f64::INFINITY, Timebase::NANOS),
            Duration::ZERO
        );
    }

    #[test]
    fn scaling() {
        let d = Duration(1_000);
        assert_eq!(d.mul_f64(0.5), Duration(500));
        assert_eq!(d.mul_f64(0.0), Duration::ZERO);
        assert_eq!(d.mul_f64(-2.0), Duration::ZERO);
        assert_eq!(d.mul_f64(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn fraction_elapsed_clamps() {
        let d = Duration(100);
        assert_eq!(d.fraction_elapsed(Duration(50)), 0.5);
        assert_eq!(d.fraction_elapsed(Duration(500)), 1.0);
        assert_eq!(Duration::ZERO.fraction_elapsed(Duration::ZERO), 1.0);
    }

    #[test]
    fn host_time_ops() {
        let t = HostTime(1000);
        assert_eq!((t + Duration(200)).ticks(), 1200);
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
        assert_eq!(HostTime(u64::MAX).saturating_add(Duration(1)), HostTime(u64::MAX));
    }
}
