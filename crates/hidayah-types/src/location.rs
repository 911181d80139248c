//! Location collaborator contracts.
//!
//! The device location service, reverse geocoding and GeoIP lookup are
//! implemented outside the core; these traits are the seams they plug into.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::{HidayahError, LocationError};
use crate::geo::GeoPoint;

/// Outcome of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Source of the user's current position.
pub trait LocationProvider: Send + Sync {
    /// Asks the user for foreground location access.
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// Produces a single position fix.
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, LocationError>> + Send;
}

/// Requests permission, then a fix. Denial short-circuits to `PermissionDenied`.
pub async fn locate<L: LocationProvider>(locator: &L) -> Result<GeoPoint, LocationError> {
    if !locator.request_permission().await.is_granted() {
        return Err(LocationError::PermissionDenied);
    }
    locator.current_position().await
}

/// Place name details for a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Geographic coordinates.
    pub coords: GeoPoint,
    /// City name (if available).
    pub city: Option<String>,
    /// Region/Province name (if available).
    pub region: Option<String>,
    /// Country name (if available).
    pub country: Option<String>,
}

impl LocationInfo {
    /// Returns formatted location string
    /// (e.g., "Yogyakarta, Daerah Istimewa Yogyakarta, Indonesia").
    ///
    /// Falls back to the coordinates when no name part is known.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [
            self.city.as_deref(),
            self.region.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            self.coords.to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl From<GeoPoint> for LocationInfo {
    /// A place known only by its coordinates.
    fn from(coords: GeoPoint) -> Self {
        Self { coords, city: None, region: None, country: None }
    }
}

/// Turns coordinates into a human-readable place.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse(
        &self,
        coords: GeoPoint,
    ) -> impl Future<Output = Result<LocationInfo, HidayahError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_info_display_name() {
        let info = LocationInfo {
            coords: GeoPoint::new_unchecked(-6.2088, 106.8456),
            city: Some("Jakarta".to_string()),
            region: Some("DKI Jakarta".to_string()),
            country: Some("Indonesia".to_string()),
        };
        assert_eq!(info.display_name(), "Jakarta, DKI Jakarta, Indonesia");
    }

    #[test]
    fn test_location_info_skips_missing_parts() {
        let info = LocationInfo {
            coords: GeoPoint::new_unchecked(40.7128, -74.006),
            city: Some("New York".to_string()),
            region: None,
            country: Some("USA".to_string()),
        };
        assert_eq!(info.display_name(), "New York, USA");
    }

    #[test]
    fn test_location_info_display_name_coords_only() {
        let info = LocationInfo {
            coords: GeoPoint::new_unchecked(-6.2088, 106.8456),
            city: None,
            region: None,
            country: None,
        };
        assert!(info.display_name().contains("-6.2088"));
    }
}
