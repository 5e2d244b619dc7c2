// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for run-to-completion animations.
//!
//! [`SpringTiming`] is a duration-bounded damped harmonic oscillator: the
//! natural frequency is derived from the duration so that the spring has
//! settled by the end of the animation, and the curve is corrected so that it
//! lands on exactly 1.0 at the final fraction. Geometry and overlay opacity
//! share the same eased fraction, so they arrive together.

/// Exponential decay rate of the spring envelope, in units of 1 / duration.
///
/// `e^-10` leaves less than 0.01 % of the travel before the end-point
/// correction.
const SETTLE_RATE: f64 = 10.0;

/// Damping ratios this close to 1.0 use the critically damped solution.
const CRITICAL_EPSILON: f64 = 1e-6;

/// A spring easing curve normalized to a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringTiming {
    /// 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = sluggish.
    pub damping_ratio: f64,
    /// Initial vertical velocity in units of the full travel per second.
    pub initial_velocity: f64,
    /// Duration the curve is normalized to, in seconds.
    pub duration: f64,
}

impl SpringTiming {
    /// Creates a spring for the given damping ratio, initial velocity, and
    /// duration in seconds.
    #[must_use]
    pub const fn new(damping_ratio: f64, initial_velocity: f64, duration: f64) -> Self {
        Self {
            damping_ratio,
            initial_velocity,
            duration,
        }
    }

    /// Displacement from the target at normalized time `t`, starting from
    /// 1.0 at `t = 0`.
    fn displacement(&self, t: f64) -> f64 {
        let zeta = if self.damping_ratio.is_finite() && self.damping_ratio > 0.0 {
            self.damping_ratio
        } else {
            1.0
        };
        let duration = if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            1.0
        };
        let v0 = if self.initial_velocity.is_finite() {
            self.initial_velocity * duration
        } else {
            0.0
        };

        if (zeta - 1.0).abs() < CRITICAL_EPSILON {
            let omega = SETTLE_RATE;
            libm::exp(-omega * t) * (1.0 + (omega - v0) * t)
        } else if zeta < 1.0 {
            let omega = SETTLE_RATE / zeta;
            let omega_d = omega * libm::sqrt(1.0 - zeta * zeta);
            libm::exp(-zeta * omega * t)
                * (libm::cos(omega_d * t) + (zeta * omega - v0) / omega_d * libm::sin(omega_d * t))
        } else {
            let s = libm::sqrt(zeta * zeta - 1.0);
            let omega = SETTLE_RATE / (zeta - s);
            let r1 = omega * (zeta - s);
            let r2 = omega * (zeta + s);
            let a = (r2 - v0) / (r2 - r1);
            let b = 1.0 - a;
            a * libm::exp(-r1 * t) + b * libm::exp(-r2 * t)
        }
    }

    /// Maps a linear fraction in `[0, 1]` to eased progress.
    ///
    /// Returns exactly 0.0 at or before the start and exactly 1.0 at or past
    /// the end. Under-damped springs may overshoot 1.0 in between.
    #[must_use]
    pub fn transform(&self, fraction: f64) -> f64 {
        if fraction.is_nan() || fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        let raw = 1.0 - self.displacement(fraction);
        // Spread what is left of the travel at t = 1 across the curve.
        raw + fraction * self.displacement(1.0)
    }
}

impl Default for SpringTiming {
    fn default() -> Self {
        Self::new(1.0, 0.0, crate::config::DEFAULT_DURATION_SECS)
    }
}

/// Easing applied by the [`InteractiveDriver`](crate::driver::InteractiveDriver)
/// to run-to-completion animations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Duration-normalized spring.
    Spring(SpringTiming),
}

impl Easing {
    /// Maps a linear fraction in `[0, 1]` to eased progress.
    #[must_use]
    pub fn transform(&self, fraction: f64) -> f64 {
        match self {
            Self::Linear => {
                if fraction.is_finite() {
                    fraction.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            Self::Spring(spring) => spring.transform(fraction),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Spring(SpringTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(easing: &Easing) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..=100).map(move |i| {
            let f = f64::from(i) / 100.0;
            (f, easing.transform(f))
        })
    }

    #[test]
    fn endpoints_are_exact() {
        for zeta in [0.5, 1.0, 2.0] {
            let spring = SpringTiming::new(zeta, 1.0, 0.52);
            assert_eq!(spring.transform(0.0), 0.0, "zeta {zeta} start");
            assert_eq!(spring.transform(1.0), 1.0, "zeta {zeta} end");
            assert_eq!(spring.transform(-3.0), 0.0, "zeta {zeta} before start");
            assert_eq!(spring.transform(7.0), 1.0, "zeta {zeta} after end");
        }
    }

    #[test]
    fn critically_damped_is_monotonic() {
        let easing = Easing::Spring(SpringTiming::new(1.0, 1.0, 0.52));
        let mut prev = 0.0;
        for (f, v) in samples(&easing) {
            assert!(v >= prev - 1e-12, "not monotonic at {f}: {v} < {prev}");
            assert!(v <= 1.0 + 1e-12, "overshoot at {f}: {v}");
            prev = v;
        }
    }

    #[test]
    fn overdamped_is_monotonic() {
        let easing = Easing::Spring(SpringTiming::new(2.5, 0.0, 0.3));
        let mut prev = 0.0;
        for (f, v) in samples(&easing) {
            assert!(v >= prev - 1e-12, "not monotonic at {f}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn underdamped_overshoots() {
        let easing = Easing::Spring(SpringTiming::new(0.3, 0.0, 1.0));
        let peak = samples(&easing).map(|(_, v)| v).fold(0.0, f64::max);
        assert!(peak > 1.0, "bouncy spring should overshoot, peak {peak}");
    }

    #[test]
    fn spring_front_loads_motion() {
        let spring = SpringTiming::new(1.0, 0.0, 0.52);
        assert!(
            spring.transform(0.25) > 0.25,
            "spring should lead linear at a quarter of the way"
        );
    }

    #[test]
    fn initial_velocity_pushes_toward_target() {
        let resting = SpringTiming::new(1.0, 0.0, 1.0);
        let thrown = SpringTiming::new(1.0, 4.0, 1.0);
        let early = (resting.transform(0.05), thrown.transform(0.05));
        assert!(early.1 > early.0 + 0.1, "velocity should lead early: {early:?}");
        assert_eq!(thrown.transform(1.0), 1.0);
    }

    #[test]
    fn degenerate_parameters_fall_back() {
        let spring = SpringTiming::new(f64::NAN, f64::INFINITY, 0.0);
        let mid = spring.transform(0.5);
        assert!(mid.is_finite() && mid > 0.0 && mid <= 1.0, "got {mid}");
        assert_eq!(Easing::Linear.transform(f64::NAN), 0.0);
        assert_eq!(Easing::Spring(spring).transform(f64::NAN), 0.0);
    }
}
