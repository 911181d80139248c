//! Compass angles.
//!
//! Every angle type here can only be built through [`normalize_degrees`], so a
//! value outside `[0, 360)` (or a NaN) never leaves this module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One full turn in degrees.
pub const FULL_TURN: f64 = 360.0;

/// Folds any degree value into `[0, 360)`.
///
/// Non-finite input (NaN, ±∞) maps to `0.0`. A NaN reaching the modulo
/// arithmetic would poison every later reading, so it is dropped here.
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(FULL_TURN);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if r >= FULL_TURN || r == 0.0 { 0.0 } else { r }
}

/// Great-circle initial bearing, clockwise from true north.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearingDegrees(f64);

impl BearingDegrees {
    pub fn new(deg: f64) -> Self {
        Self(normalize_degrees(deg))
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

/// Direction the device currently faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingDegrees(f64);

impl HeadingDegrees {
    pub fn new(deg: f64) -> Self {
        Self(normalize_degrees(deg))
    }

    /// Heading from a planar magnetometer reading, `atan2(y, x)`.
    pub fn from_vector(x: f64, y: f64) -> Self {
        Self::new(y.atan2(x).to_degrees())
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

/// Rotation of the needle relative to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayAngle(f64);

impl DisplayAngle {
    pub fn new(deg: f64) -> Self {
        Self(normalize_degrees(deg))
    }

    /// `(bearing - heading + 360) mod 360`.
    pub fn between(bearing: BearingDegrees, heading: HeadingDegrees) -> Self {
        Self::new(bearing.degrees() - heading.degrees() + FULL_TURN)
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl fmt::Display for BearingDegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl fmt::Display for HeadingDegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl fmt::Display for DisplayAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_wraps_both_directions() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-720.0), 0.0);
    }

    #[test]
    fn test_normalize_non_finite_is_zero() {
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
        assert_eq!(normalize_degrees(f64::INFINITY), 0.0);
        assert_eq!(normalize_degrees(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_does_not_reach_360() {
        let r = normalize_degrees(-1e-14);
        assert!(r < FULL_TURN);
    }

    #[test]
    fn test_display_angle_examples() {
        let a = DisplayAngle::between(BearingDegrees::new(100.0), HeadingDegrees::new(30.0));
        assert!((a.degrees() - 70.0).abs() < 1e-9);

        let wrap = DisplayAngle::between(BearingDegrees::new(10.0), HeadingDegrees::new(350.0));
        assert!((wrap.degrees() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_from_vector() {
        assert!((HeadingDegrees::from_vector(0.0, 1.0).degrees() - 90.0).abs() < 1e-9);
        assert!((HeadingDegrees::from_vector(0.0, -1.0).degrees() - 270.0).abs() < 1e-9);
        assert_eq!(HeadingDegrees::from_vector(f64::NAN, 1.0).degrees(), 0.0);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&BearingDegrees::new(45.5)).unwrap();
        assert_eq!(json, "45.5");
    }

    proptest! {
        #[test]
        fn normalized_always_in_range(deg in proptest::num::f64::ANY) {
            let r = normalize_degrees(deg);
            prop_assert!((0.0..FULL_TURN).contains(&r), "{} -> {}", deg, r);
        }

        #[test]
        fn display_angle_always_in_range(b in -1.0e6f64..1.0e6, h in -1.0e6f64..1.0e6) {
            let a = DisplayAngle::between(BearingDegrees::new(b), HeadingDegrees::new(h));
            prop_assert!((0.0..FULL_TURN).contains(&a.degrees()));
        }
    }
}
