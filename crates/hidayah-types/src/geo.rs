use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HidayahError;

/// A position on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, positive north. Range [-90, 90].
    pub lat: f64,
    /// Longitude, positive east. Range [-180, 180].
    pub lng: f64,
}

/// The Kaaba in Makkah, the fixed Qibla target.
pub const KAABA: GeoPoint = GeoPoint::new_unchecked(21.4225, 39.8262);

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if either component is not finite or is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, HidayahError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if lat_ok && lng_ok {
            Ok(Self { lat, lng })
        } else {
            Err(HidayahError::InvalidCoordinate { lat, lng })
        }
    }

    /// Creates a point without range checks. Use for trusted constants only.
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lng_rad(&self) -> f64 {
        self.lng.to_radians()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::new(91.0, 0.0),
            Err(HidayahError::InvalidCoordinate { .. })
        ));
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_radian_accessors() {
        let p = GeoPoint::new_unchecked(90.0, -180.0);
        assert!((p.lat_rad() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((p.lng_rad() + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let p = GeoPoint::new_unchecked(-6.2088, 106.8456);
        assert_eq!(p.to_string(), "-6.2088°, 106.8456°");
        assert_eq!(KAABA.to_string(), "21.4225°, 39.8262°");
    }
}
