//! Offline IP geolocation from a MaxMind GeoLite2 City database.
//!
//! No data leaves the machine. Accuracy is city level at best, which is
//! plenty for a qibla bearing.

use std::net::IpAddr;
use std::path::Path;

use hidayah_types::{
    GeoPoint, HidayahError, LocationError, LocationInfo, LocationProvider, PermissionStatus,
};
use maxminddb::{Reader, geoip2};
use tracing::debug;

/// Looks up coordinates for a fixed IP address in a local database.
///
/// As a [`LocationProvider`] it never asks for permission; lookup failures
/// surface as `PositionUnavailable`.
pub struct LocalGeoProvider {
    reader: Reader<Vec<u8>>,
    ip: IpAddr,
}

impl std::fmt::Debug for LocalGeoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGeoProvider").field("ip", &self.ip).finish()
    }
}

impl LocalGeoProvider {
    /// Opens the database at `db_path`.
    ///
    /// # Errors
    /// Returns `DatabaseError` if the file cannot be read.
    ///
    /// # Example
    /// ```rust,no_run
    /// use hidayah_network::LocalGeoProvider;
    ///
    /// let ip = "8.8.8.8".parse().unwrap();
    /// let geo = LocalGeoProvider::open("/path/to/GeoLite2-City.mmdb", ip).unwrap();
    /// println!("{}", geo.lookup(ip).unwrap().display_name());
    /// ```
    pub fn open(db_path: impl AsRef<Path>, ip: IpAddr) -> Result<Self, HidayahError> {
        let db_path = db_path.as_ref();
        let reader = Reader::open_readfile(db_path).map_err(|e| {
            let msg = format!("Failed to open MaxMind DB at {:?}: {}", db_path, e);
            HidayahError::DatabaseError(msg)
        })?;
        Ok(Self { reader, ip })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Place and coordinates for any address in the database.
    pub fn lookup(&self, ip: IpAddr) -> Result<LocationInfo, HidayahError> {
        let city: geoip2::City = self
            .reader
            .lookup(ip)
            .and_then(|found| found.decode::<geoip2::City>())
            .map_err(|e| {
                HidayahError::DatabaseError(format!("IP lookup failed for {}: {}", ip, e))
            })?
            .ok_or_else(|| HidayahError::DatabaseError(format!("No record for IP {}", ip)))?;

        let (Some(lat), Some(lng)) = (city.location.latitude, city.location.longitude) else {
            return Err(HidayahError::DatabaseError(format!("No location data for IP {}", ip)));
        };
        let coords = GeoPoint::new(lat, lng)?;
        debug!(%ip, %coords, "maxmind lookup");

        Ok(LocationInfo {
            coords,
            city: city.city.names.english.map(str::to_string),
            region: city
                .subdivisions
                .first()
                .and_then(|s| s.names.english)
                .map(str::to_string),
            country: city.country.names.english.map(str::to_string),
        })
    }
}

impl LocationProvider for LocalGeoProvider {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        self.lookup(self.ip)
            .map(|info| info.coords)
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))
    }
}
