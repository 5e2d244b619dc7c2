// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag samples and their translation into dismissal progress.
//!
//! The host forwards one [`GestureSample`] per input event. The
//! [`GestureTranslator`] turns the vertical translation into a
//! [`DragTranslation`]: the raw progress fraction, the offset to apply to the
//! sheet frame, and the progress to show in the UI.
//!
//! # Resistance
//!
//! While the host policy vetoes dismissal, downward drags are fed through a
//! [`ResistanceCurve`] so the sheet visibly resists being pulled. Two curves
//! ship with the crate and any other can be plugged in through
//! [`Resistance::Custom`]. Every curve must be monotonic non-decreasing in the
//! translation, bounded above, and pass through the origin.

use alloc::sync::Arc;
use core::fmt;

/// Phase of a drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// The drag was recognized.
    Began,
    /// The finger moved.
    Changed,
    /// The finger lifted.
    Ended,
    /// The system took the touch away.
    Cancelled,
    /// The recognizer failed or reported a phase the engine does not model.
    Failed,
}

/// One drag sample, produced by the host per input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    /// Vertical translation since the drag began, in points. Positive is
    /// downward.
    pub translation_y: f64,
    /// Vertical velocity in points per second. Positive is downward.
    pub velocity_y: f64,
    /// Gesture phase.
    pub phase: GesturePhase,
}

impl GestureSample {
    /// A `Began` sample at zero translation.
    #[must_use]
    pub const fn began() -> Self {
        Self {
            translation_y: 0.0,
            velocity_y: 0.0,
            phase: GesturePhase::Began,
        }
    }

    /// A `Changed` sample.
    #[must_use]
    pub const fn changed(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            translation_y,
            velocity_y,
            phase: GesturePhase::Changed,
        }
    }

    /// An `Ended` sample.
    #[must_use]
    pub const fn ended(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            translation_y,
            velocity_y,
            phase: GesturePhase::Ended,
        }
    }

    /// A `Cancelled` sample.
    #[must_use]
    pub const fn cancelled(translation_y: f64) -> Self {
        Self {
            translation_y,
            velocity_y: 0.0,
            phase: GesturePhase::Cancelled,
        }
    }
}

/// A damping function applied to drag translation while dismissal is vetoed.
pub trait ResistanceCurve {
    /// Maps a non-negative translation to a damped offset, both in points.
    fn apply(&self, translation: f64, sheet_height: f64) -> f64;

    /// The least upper bound of [`apply`](Self::apply) for this sheet height.
    fn upper_bound(&self, sheet_height: f64) -> f64;
}

/// Rational damping: `a·y / (b + c·y)`.
///
/// Saturates at `a / c` points regardless of the sheet height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RationalDamping {
    /// Numerator gain.
    pub a: f64,
    /// Denominator constant.
    pub b: f64,
    /// Denominator slope.
    pub c: f64,
}

impl Default for RationalDamping {
    fn default() -> Self {
        Self {
            a: 3.0,
            b: 3.5,
            c: 0.02,
        }
    }
}

impl ResistanceCurve for RationalDamping {
    fn apply(&self, translation: f64, sheet_height: f64) -> f64 {
        if translation.is_nan() || translation <= 0.0 {
            return 0.0;
        }
        // Huge translations overflow to inf or NaN; `min` maps both to the bound.
        (self.a * translation / (self.b + self.c * translation))
            .min(self.upper_bound(sheet_height))
    }

    fn upper_bound(&self, _sheet_height: f64) -> f64 {
        self.a / self.c
    }
}

/// Logistic saturation: `gain · cap · h / (1 + k / y^p)`.
///
/// Saturates at `gain · cap · h`, where `h` is the sheet height. With the
/// default parameters that is 0.65 h, approached slowly: a drag the full
/// sheet height long moves the sheet about 0.17 h.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogisticSaturation {
    /// Fraction of the sheet height that, scaled by [`gain`](Self::gain),
    /// bounds the offset.
    ///
    /// This is not the bound by itself: the offset approaches
    /// `gain · cap · h`.
    pub cap: f64,
    /// Multiplier on `cap · h`.
    pub gain: f64,
    /// Half-saturation constant.
    pub k: f64,
    /// Hill exponent.
    pub p: f64,
}

impl Default for LogisticSaturation {
    fn default() -> Self {
        Self {
            cap: 0.25,
            gain: 2.6,
            k: 4338.47,
            p: 1.14791,
        }
    }
}

impl ResistanceCurve for LogisticSaturation {
    fn apply(&self, translation: f64, sheet_height: f64) -> f64 {
        if translation <= 0.0 || sheet_height <= 0.0 {
            return 0.0;
        }
        let ceiling = self.upper_bound(sheet_height);
        let denom = 1.0 + self.k / libm::pow(translation, self.p);
        if denom.is_finite() {
            ceiling / denom
        } else {
            0.0
        }
    }

    fn upper_bound(&self, sheet_height: f64) -> f64 {
        self.gain * self.cap * sheet_height.max(0.0)
    }
}

/// The resistance policy used while dismissal is vetoed.
#[derive(Clone)]
pub enum Resistance {
    /// [`RationalDamping`].
    Rational(RationalDamping),
    /// [`LogisticSaturation`].
    Logistic(LogisticSaturation),
    /// Any other curve.
    Custom(Arc<dyn ResistanceCurve + Send + Sync>),
}

impl Default for Resistance {
    fn default() -> Self {
        Self::Rational(RationalDamping::default())
    }
}

impl fmt::Debug for Resistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational(curve) => f.debug_tuple("Rational").field(curve).finish(),
            Self::Logistic(curve) => f.debug_tuple("Logistic").field(curve).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}

impl ResistanceCurve for Resistance {
    fn apply(&self, translation: f64, sheet_height: f64) -> f64 {
        match self {
            Self::Rational(curve) => curve.apply(translation, sheet_height),
            Self::Logistic(curve) => curve.apply(translation, sheet_height),
            Self::Custom(curve) => curve.apply(translation, sheet_height),
        }
    }

    fn upper_bound(&self, sheet_height: f64) -> f64 {
        match self {
            Self::Rational(curve) => curve.upper_bound(sheet_height),
            Self::Logistic(curve) => curve.upper_bound(sheet_height),
            Self::Custom(curve) => curve.upper_bound(sheet_height),
        }
    }
}

/// The result of translating one drag sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragTranslation {
    /// `min(translation / height, 1)`; negative while the drag is above the
    /// resting position.
    pub raw_progress: f64,
    /// Progress to drive the frame and overlay with.
    pub progress: f64,
    /// Offset of the sheet from its resting frame, in points.
    pub offset: f64,
    /// Whether the resistance curve was applied.
    pub resisted: bool,
}

impl DragTranslation {
    /// Zero travel.
    pub const REST: Self = Self {
        raw_progress: 0.0,
        progress: 0.0,
        offset: 0.0,
        resisted: false,
    };

    /// Whether the drag is above the resting position.
    #[must_use]
    pub fn is_overscroll(&self) -> bool {
        self.raw_progress < 0.0
    }
}

/// Returns `min(translation / height, 1)`, or 0 for degenerate input.
#[must_use]
pub fn raw_progress(translation: f64, height: f64) -> f64 {
    if !height.is_finite() || height <= 0.0 || translation.is_nan() {
        return 0.0;
    }
    let progress = (translation / height).min(1.0);
    if progress.is_finite() { progress } else { 0.0 }
}

/// Converts drag translation into progress for one sheet.
#[derive(Clone, Debug, Default)]
pub struct GestureTranslator {
    resistance: Resistance,
}

impl GestureTranslator {
    /// Creates a translator with the given resistance policy.
    #[must_use]
    pub fn new(resistance: Resistance) -> Self {
        Self { resistance }
    }

    /// Returns the resistance policy.
    #[must_use]
    pub fn resistance(&self) -> &Resistance {
        &self.resistance
    }

    /// Translates a vertical drag for a sheet of the given height.
    #[must_use]
    pub fn translate(&self, translation: f64, height: f64, veto_active: bool) -> DragTranslation {
        let translation = if translation.is_nan() {
            0.0
        } else {
            translation
        };
        let raw = raw_progress(translation, height);

        if raw < 0.0 {
            return DragTranslation {
                raw_progress: raw,
                progress: raw,
                offset: translation,
                resisted: false,
            };
        }

        if !veto_active {
            return DragTranslation {
                raw_progress: raw,
                progress: raw,
                offset: translation,
                resisted: false,
            };
        }

        let offset = self.resistance.apply(translation, height);
        DragTranslation {
            raw_progress: raw,
            progress: raw_progress(offset, height),
            offset,
            resisted: true,
        }
    }
}
