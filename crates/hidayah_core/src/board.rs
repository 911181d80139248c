//! Prayer times screen.

use chrono::{DateTime, Utc};
use hidayah_types::{
    GeoPoint, HidayahError, LocationInfo, LocationProvider, Prayer, PrayerParams, PrayerTimes,
    PrayerTimesProvider, ReverseGeocoder, locate,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Today's prayer schedule for the user's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerBoard {
    pub location: GeoPoint,
    /// City label, or the formatted coordinates when reverse geocoding failed.
    pub label: String,
    pub params: PrayerParams,
    pub times: PrayerTimes,
    pub next: Option<Prayer>,
}

impl PrayerBoard {
    /// Locates the user, names the place, computes the day's times and picks
    /// the next prayer after `now`.
    ///
    /// The place name is best effort: a geocoder error is logged and the
    /// coordinates are shown instead.
    ///
    /// # Errors
    /// `Location(PermissionDenied)` or `Location(PositionUnavailable)` from
    /// the locator, or whatever the prayer-times provider returns.
    pub async fn load<L, G, P>(
        locator: &L,
        geocoder: &G,
        provider: &P,
        params: PrayerParams,
        now: DateTime<Utc>,
    ) -> Result<Self, HidayahError>
    where
        L: LocationProvider,
        G: ReverseGeocoder,
        P: PrayerTimesProvider,
    {
        let location = locate(locator).await?;

        let label = match geocoder.reverse(location).await {
            Ok(info) => info.display_name(),
            Err(e) => {
                warn!(%location, error = %e, "reverse geocoding failed, showing coordinates");
                LocationInfo::from(location).display_name()
            }
        };

        let times = provider.compute(now.date_naive(), location, &params).await?;
        let next = times.next_after(now);
        debug!(%label, next = ?next, "prayer board loaded");

        Ok(Self { location, label, params, times, next })
    }

    /// Re-picks the next prayer as the clock moves on.
    pub fn refresh_next(&mut self, now: DateTime<Utc>) -> Option<Prayer> {
        self.next = self.times.next_after(now);
        self.next
    }

    pub fn next_time(&self) -> Option<DateTime<Utc>> {
        self.next.map(|p| self.times.time_of(p))
    }

    /// "Method: Muslim World League • Madhab: Shafi"
    pub fn method_label(&self) -> String {
        self.params.describe()
    }
}
