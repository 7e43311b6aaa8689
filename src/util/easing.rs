//! Easing curves for reaction animation keyframes.
//!
//! The scene writer samples these when an animation asks for anything other
//! than linear motion, baking the curve into per-frame time samples.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Smoothstep ease-in-out, `3t² - 2t³`.
    Smoothstep,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First inner control value.
        c1: f32,
        /// Second inner control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]; endpoints map to 0.0 and 1.0.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticIn => t * t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::Smoothstep => t * t * (3.0 - 2.0 * t),
            EasingFunction::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }

    /// Whether the curve is the identity, so keyframes alone describe it.
    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self, EasingFunction::Linear)
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::Linear
    }
}
