use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a position could not be obtained from the location collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Permission was granted but no fix could be produced.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Errors from hidayah operations.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum HidayahError {
    /// Latitude or longitude outside [-90, 90] / [-180, 180], or not finite.
    #[error("Invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// No heading sensor on this device.
    #[error("Heading sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// Location collaborator failure.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Remote API failure (transport or payload).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Local GeoIP database failure.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Hijri calendar lookup produced nothing usable.
    #[error("Calendar error: {0}")]
    Calendar(String),
}

impl HidayahError {
    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    /// Creates a `NetworkError` from any displayable cause.
    pub fn network(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::NetworkError(format!("{}: {}", context, cause))
    }

    /// Returns true when the failure came from a denied location permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Location(LocationError::PermissionDenied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_error_is_transparent() {
        let err: HidayahError = LocationError::PermissionDenied.into();
        assert_eq!(err.to_string(), "Location permission denied");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_network_helper_formats_context() {
        let err = HidayahError::network("AlAdhan request failed", "timeout");
        assert_eq!(err.to_string(), "Network error: AlAdhan request failed: timeout");
        assert!(!err.is_permission_denied());
    }
}
