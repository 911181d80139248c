//! Network-backed collaborators for hidayah.
//!
//! - [`AladhanClient`]: Hijri dates and calendar months over HTTP
//! - [`NominatimClient`]: reverse geocoding for the location label
//! - `LocalGeoProvider` (feature `local-geo`): offline IP geolocation

pub mod aladhan;
#[cfg(feature = "local-geo")]
pub mod local_geo;
pub mod nominatim;

pub use aladhan::{ALADHAN_BASE_URL, AladhanClient};
#[cfg(feature = "local-geo")]
pub use local_geo::LocalGeoProvider;
pub use nominatim::{NOMINATIM_BASE_URL, NominatimClient};
