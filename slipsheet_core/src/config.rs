// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-presentation transition parameters.
//!
//! A [`TransitionConfig`] is built once when a presentation is requested and
//! handed to [`SheetTransition::begin_presentation`], which owns it for the
//! lifetime of the session. Nothing in the engine mutates it afterwards.
//!
//! [`SheetTransition::begin_presentation`]: crate::machine::SheetTransition::begin_presentation

use core::fmt;

use kurbo::Affine;

use crate::gesture::Resistance;
use crate::scroll::TopEdge;

/// Default transition duration in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 0.52;

/// Default scale applied to the presenting content by [`TransitionConfig::page_sheet`].
pub const PAGE_SHEET_ZOOM_BACK: f64 = 0.895;

/// Straight RGBA color of the dimming overlay, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskColor {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha of the fully presented overlay.
    pub a: f32,
}

impl MaskColor {
    /// Black with the given alpha.
    #[must_use]
    pub const fn black(alpha: f32) -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: alpha,
        }
    }

    /// Returns the color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "overlay opacity is in [0, 1]; f32 precision is plenty"
        )]
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        Self {
            a: self.a * opacity,
            ..self
        }
    }
}

impl Default for MaskColor {
    fn default() -> Self {
        Self::black(0.5)
    }
}

/// Release thresholds for committing an interactive dismissal.
///
/// Both comparisons are strict: a drag commits when `progress > progress`
/// or `velocity > velocity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissThresholds {
    /// Fraction of the sheet height past which a release commits.
    pub progress: f64,
    /// Downward release velocity, in points per second, past which a
    /// release commits regardless of progress.
    pub velocity: f64,
}

impl Default for DismissThresholds {
    fn default() -> Self {
        Self {
            progress: 0.4,
            velocity: 900.0,
        }
    }
}

/// How long a restore-to-rest animation runs after a drag is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestoreTiming {
    /// `duration × progress`: the sheet travels back at a constant perceived
    /// speed, so a half-height drag restores in half the time of a full one.
    #[default]
    ProportionalToDistance,
    /// `duration × (1 − progress)`.
    ProportionalToRemaining,
    /// Always the full configured duration.
    Full,
}

impl RestoreTiming {
    /// Returns the fraction of the configured duration a restore from
    /// `progress` should take.
    #[must_use]
    pub fn scale(self, progress: f64) -> f64 {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match self {
            Self::ProportionalToDistance => progress,
            Self::ProportionalToRemaining => 1.0 - progress,
            Self::Full => 1.0,
        }
    }
}

/// Why a [`TransitionConfig`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// The duration was zero, negative, or not finite.
    InvalidDuration(f64),
    /// The damping ratio was zero, negative, or not finite.
    InvalidDampingRatio(f64),
    /// A dismissal threshold was negative or not finite.
    InvalidThreshold(f64),
    /// The corner radius was negative or not finite.
    InvalidCornerRadius(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(v) => write!(f, "transition duration must be > 0, got {v}"),
            Self::InvalidDampingRatio(v) => write!(f, "damping ratio must be > 0, got {v}"),
            Self::InvalidThreshold(v) => write!(f, "dismiss threshold must be >= 0, got {v}"),
            Self::InvalidCornerRadius(v) => write!(f, "corner radius must be >= 0, got {v}"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Immutable parameters for one presentation.
#[derive(Clone, Debug)]
pub struct TransitionConfig {
    /// Color of the dimming overlay when fully presented.
    pub mask_color: MaskColor,
    /// Duration of full-travel animations, in seconds.
    pub duration: f64,
    /// Whether drag-to-dismiss is installed at all.
    pub interaction_enabled: bool,
    /// Whether tapping the overlay dismisses the sheet.
    pub dismiss_on_background_tap: bool,
    /// Transform applied to the presenting content while the sheet is up.
    pub from_view_transform: Option<Affine>,
    /// Spring damping ratio; 1.0 is critically damped.
    pub damping_ratio: f64,
    /// Initial spring velocity along the sheet's vertical axis, in units of
    /// the full travel per second.
    ///
    /// Sheets only travel vertically, so a horizontal component would never
    /// be read; hosts that track a 2D velocity pass its `y` component.
    pub initial_velocity: f64,
    /// Radius of the sheet's two top corners.
    pub corner_radius: f64,
    /// Release thresholds for committing a drag.
    pub thresholds: DismissThresholds,
    /// Resistance applied to drags while dismissal is vetoed.
    pub resistance: Resistance,
    /// Duration policy for restore-to-rest animations.
    pub restore_timing: RestoreTiming,
    /// Duration policy for restores after a drag made while dismissal was
    /// vetoed.
    ///
    /// Defaults to [`RestoreTiming::ProportionalToRemaining`], so a short
    /// resisted pull takes close to the full duration to settle.
    pub veto_restore_timing: RestoreTiming,
    /// How the embedded scroll region's top edge gates the drag.
    pub top_edge: TopEdge,
}

impl TransitionConfig {
    /// Creates a configuration with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mask_color: MaskColor::default(),
            duration: DEFAULT_DURATION_SECS,
            interaction_enabled: true,
            dismiss_on_background_tap: true,
            from_view_transform: None,
            damping_ratio: 1.0,
            initial_velocity: 1.0,
            corner_radius: 10.0,
            thresholds: DismissThresholds::default(),
            resistance: Resistance::default(),
            restore_timing: RestoreTiming::default(),
            veto_restore_timing: RestoreTiming::ProportionalToRemaining,
            top_edge: TopEdge::default(),
        }
    }

    /// A page-sheet look: a lighter mask and the presenting content zoomed
    /// back behind the sheet.
    #[must_use]
    pub fn page_sheet() -> Self {
        Self::new()
            .with_mask_color(MaskColor::black(0.4))
            .with_from_view_transform(Affine::scale(PAGE_SHEET_ZOOM_BACK))
    }

    /// A plain sheet: no zoom-back and no background-tap dismissal.
    #[must_use]
    pub fn plain() -> Self {
        Self::new().with_dismiss_on_background_tap(false)
    }

    /// Sets the overlay color.
    #[must_use]
    pub fn with_mask_color(mut self, color: MaskColor) -> Self {
        self.mask_color = color;
        self
    }

    /// Sets the full-travel duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    /// Enables or disables drag-to-dismiss.
    #[must_use]
    pub fn with_interaction_enabled(mut self, enabled: bool) -> Self {
        self.interaction_enabled = enabled;
        self
    }

    /// Enables or disables background-tap dismissal.
    #[must_use]
    pub fn with_dismiss_on_background_tap(mut self, enabled: bool) -> Self {
        self.dismiss_on_background_tap = enabled;
        self
    }

    /// Sets the presenting-content transform.
    #[must_use]
    pub fn with_from_view_transform(mut self, transform: Affine) -> Self {
        self.from_view_transform = Some(transform);
        self
    }

    /// Sets the spring parameters.
    ///
    /// `initial_velocity` is vertical, in units of the full travel per second.
    #[must_use]
    pub fn with_spring(mut self, damping_ratio: f64, initial_velocity: f64) -> Self {
        self.damping_ratio = damping_ratio;
        self.initial_velocity = initial_velocity;
        self
    }

    /// Sets the top corner radius.
    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Sets the release thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: DismissThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the veto resistance curve.
    #[must_use]
    pub fn with_resistance(mut self, resistance: Resistance) -> Self {
        self.resistance = resistance;
        self
    }

    /// Sets the restore duration policy.
    #[must_use]
    pub fn with_restore_timing(mut self, timing: RestoreTiming) -> Self {
        self.restore_timing = timing;
        self
    }

    /// Sets the restore duration policy used while dismissal is vetoed.
    #[must_use]
    pub fn with_veto_restore_timing(mut self, timing: RestoreTiming) -> Self {
        self.veto_restore_timing = timing;
        self
    }

    /// Sets the scroll top-edge comparison.
    #[must_use]
    pub fn with_top_edge(mut self, top_edge: TopEdge) -> Self {
        self.top_edge = top_edge;
        self
    }

    /// Checks that numeric fields are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        if !self.damping_ratio.is_finite() || self.damping_ratio <= 0.0 {
            return Err(ConfigError::InvalidDampingRatio(self.damping_ratio));
        }
        for threshold in [self.thresholds.progress, self.thresholds.velocity] {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(ConfigError::InvalidCornerRadius(self.corner_radius));
        }
        Ok(())
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = TransitionConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.duration, DEFAULT_DURATION_SECS);
        assert!(config.interaction_enabled);
        assert!(config.from_view_transform.is_none());
        assert_eq!(config.restore_timing, RestoreTiming::ProportionalToDistance);
        assert_eq!(
            config.veto_restore_timing,
            RestoreTiming::ProportionalToRemaining
        );
    }

    #[test]
    fn page_sheet_preset() {
        let config = TransitionConfig::page_sheet();
        assert_eq!(config.mask_color, MaskColor::black(0.4));
        assert_eq!(
            config.from_view_transform,
            Some(Affine::scale(PAGE_SHEET_ZOOM_BACK))
        );
    }

    #[test]
    fn rejects_bad_duration() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = TransitionConfig::new().with_duration(bad).validate();
            assert!(
                matches!(err, Err(ConfigError::InvalidDuration(_))),
                "duration {bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_spring_and_thresholds() {
        assert!(matches!(
            TransitionConfig::new().with_spring(0.0, 1.0).validate(),
            Err(ConfigError::InvalidDampingRatio(_))
        ));
        assert!(matches!(
            TransitionConfig::new()
                .with_thresholds(DismissThresholds {
                    progress: -0.1,
                    velocity: 900.0,
                })
                .validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            TransitionConfig::new().with_corner_radius(-1.0).validate(),
            Err(ConfigError::InvalidCornerRadius(_))
        ));
    }

    #[test]
    fn spring_builder_sets_vertical_velocity() {
        let config = TransitionConfig::new().with_spring(0.8, 2.5);
        assert_eq!(config.damping_ratio, 0.8);
        assert_eq!(config.initial_velocity, 2.5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn restore_timing_scales() {
        assert_eq!(RestoreTiming::ProportionalToDistance.scale(0.5), 0.5);
        assert_eq!(RestoreTiming::ProportionalToDistance.scale(1.5), 1.0);
        assert_eq!(RestoreTiming::ProportionalToRemaining.scale(0.25), 0.75);
        assert_eq!(RestoreTiming::Full.scale(0.1), 1.0);
        assert_eq!(RestoreTiming::ProportionalToDistance.scale(f64::NAN), 0.0);
    }

    #[test]
    fn mask_color_with_opacity() {
        let c = MaskColor::black(0.5).with_opacity(0.5);
        assert_eq!(c.a, 0.25);
        assert_eq!(MaskColor::black(0.5).with_opacity(3.0).a, 0.5);
    }
}
