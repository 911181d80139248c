//! Core types for hidayah.
//!
//! Value types shared by every crate in the workspace, the error enum, and
//! the contracts through which external collaborators (device location,
//! reverse geocoding, prayer-time library) are consumed.

pub mod angle;
pub mod error;
pub mod geo;
pub mod location;
pub mod prayer;

pub use angle::{BearingDegrees, DisplayAngle, HeadingDegrees, normalize_degrees};
pub use error::{HidayahError, LocationError};
pub use geo::{GeoPoint, KAABA};
pub use location::{LocationInfo, LocationProvider, PermissionStatus, ReverseGeocoder, locate};
pub use prayer::{CalculationMethod, Madhab, Prayer, PrayerParams, PrayerTimes, PrayerTimesProvider};
