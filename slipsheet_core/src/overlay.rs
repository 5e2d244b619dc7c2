// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dimming overlay opacity.
//!
//! The overlay behind the sheet is fully opaque (at the configured mask
//! alpha) when the sheet is at rest and fully transparent when it is gone.
//! In between, the [`InteractiveDriver`] interpolates it together with the
//! sheet geometry: linearly in the scrub percent during a drag, which gives
//! `1 − progress`, and with the eased fraction during run-to-completion
//! animations.
//!
//! Every function here returns a value in `[0, 1]`.
//!
//! [`InteractiveDriver`]: crate::driver::InteractiveDriver

use crate::session::Phase;

/// Replaces non-finite progress with 0.
#[inline]
#[must_use]
pub fn finite_progress(progress: f64) -> f64 {
    if progress.is_finite() { progress } else { 0.0 }
}

/// Clamps an opacity to `[0, 1]`, mapping NaN to 0.
#[inline]
#[must_use]
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Overlay opacity fixed by a resting phase.
///
/// Returns `None` for phases where an animation or a drag decides the
/// opacity.
#[must_use]
pub fn resting_opacity(phase: Phase) -> Option<f64> {
    match phase {
        Phase::Idle | Phase::Dismissed => Some(0.0),
        Phase::Presented => Some(1.0),
        Phase::Presenting | Phase::InteractiveDismissing | Phase::AnimatedDismissing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_handles_non_finite_input() {
        assert_eq!(finite_progress(f64::NAN), 0.0);
        assert_eq!(finite_progress(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_progress(-0.2), -0.2, "overscroll is preserved");
        assert_eq!(clamp_opacity(f64::NAN), 0.0);
        assert_eq!(clamp_opacity(1.5), 1.0);
        assert_eq!(clamp_opacity(-0.5), 0.0);
    }

    #[test]
    fn resting_phases() {
        assert_eq!(resting_opacity(Phase::Idle), Some(0.0));
        assert_eq!(resting_opacity(Phase::Presented), Some(1.0));
        assert_eq!(resting_opacity(Phase::Dismissed), Some(0.0));
        assert_eq!(resting_opacity(Phase::Presenting), None);
    }

    #[test]
    fn clamp_opacity_handles_nan() {
        assert_eq!(clamp_opacity(f64::NAN), 0.0);
        assert_eq!(clamp_opacity(1.3), 1.0);
    }
}
