// extensions/easing.rs
//
// Easing curves and scalar helpers used to shape particle radius over age.
// Pure math, no engine state.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Sine wave easing (smooth).
    SineIn,
    SineOut,
    SineInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    /// Apply the curve `passes` times in a row (`SineOut` twice gives the
    /// fast-opening petal profile).
    pub fn apply_n(self, t: f64, passes: u32) -> f64 {
        (0..passes).fold(t, |acc, _| self.apply(acc))
    }
}

// ── Scalar helpers ───────────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Re-map `value` from `[in_min, in_max]` to `[out_min, out_max]` without clamping.
#[inline]
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Half-ellipse silhouette: 1 at the middle of [0, 1], 0 at both ends.
/// Inputs outside [0, 1] yield NaN; callers clamp the final radius.
#[inline]
pub fn lens(t: f64) -> f64 {
    let centered = remap(t, 0.0, 1.0, -1.0, 1.0);
    (1.0 - centered * centered).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn sine_out_faster_start() {
        let mid = Easing::SineOut.apply(0.5);
        assert!(mid > 0.5, "SineOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn quad_in_out_symmetric() {
        let a = Easing::QuadInOut.apply(0.25);
        let b = Easing::QuadInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn apply_n_compounds() {
        let once = Easing::SineOut.apply(0.3);
        assert!((Easing::SineOut.apply_n(0.3, 2) - Easing::SineOut.apply(once)).abs() < 1e-12);
        assert_eq!(Easing::SineOut.apply_n(0.3, 0), 0.3);
    }

    #[test]
    fn remap_matches_map() {
        assert!((remap(0.5, 1.0, 0.0, 3.0, 0.3) - 1.65).abs() < 1e-12);
        assert_eq!(remap(0.0, 0.0, 1.0, -1.0, 1.0), -1.0);
    }

    #[test]
    fn lens_profile() {
        assert!((lens(0.5) - 1.0).abs() < 1e-12);
        assert!(lens(0.0).abs() < 1e-12);
        assert!(lens(1.3).is_nan());
    }

    #[test]
    fn easing_names_deserialize() {
        let e: Easing = serde_json::from_str("\"sine_out\"").unwrap();
        assert_eq!(e, Easing::SineOut);
    }
}
