//! Core logic for hidayah: the Qibla compass session, the Hijri calendar
//! browser and the prayer board, over the shared types.
//!
//! Enable `async` for the HTTP collaborators and `local-geo` for offline IP
//! geolocation.

pub mod board;
pub mod session;

pub use hidayah_calendar as calendar;
pub use hidayah_qibla as qibla;
pub use hidayah_types as types;

#[cfg(feature = "async")]
pub use hidayah_network as network;

pub use board::PrayerBoard;
pub use session::{LocationStatus, QiblaSession, SensorStatus};

pub use hidayah_calendar::{
    CalendarBrowser, CalendarDay, CalendarMonth, HijriCalendarProvider, HijriDate, HijriMonth,
    MonthCursor, WeekRow, hijri_month_name, is_today,
};
pub use hidayah_qibla::{
    EnginePhase, HeadingSource, HeadingSourceKind, HeadingSubscription, MagnetometerSource,
    NeedleReading, OrientationSource, Platform, QiblaConfig, QiblaEngine, RawHeading,
    UnresolvedBearing, compute_bearing, qibla_bearing, select_heading_source,
};
pub use hidayah_types::{
    BearingDegrees, DisplayAngle, GeoPoint, HeadingDegrees, HidayahError, KAABA, LocationError,
    LocationInfo, LocationProvider, PermissionStatus, Prayer, PrayerParams, PrayerTimes,
    PrayerTimesProvider, ReverseGeocoder,
};

#[cfg(feature = "async")]
pub use hidayah_network::{AladhanClient, NominatimClient};
#[cfg(all(feature = "async", feature = "local-geo"))]
pub use hidayah_network::LocalGeoProvider;

/// Everything a screen controller usually needs.
pub mod prelude {
    pub use crate::board::PrayerBoard;
    pub use crate::session::{LocationStatus, QiblaSession, SensorStatus};
    pub use hidayah_calendar::{CalendarBrowser, CalendarMonth, HijriCalendarProvider};
    pub use hidayah_qibla::{
        HeadingSource, MagnetometerSource, OrientationSource, Platform, QiblaConfig, QiblaEngine,
        select_heading_source,
    };
    pub use hidayah_types::{
        DisplayAngle, GeoPoint, HidayahError, KAABA, LocationProvider, PermissionStatus,
        PrayerParams,
    };
}
