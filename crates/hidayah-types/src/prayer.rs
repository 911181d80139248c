use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use crate::error::HidayahError;
use crate::geo::GeoPoint;

/// The daily prayer slots, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    /// Not a prayer, but listed so the user knows when Fajr ends.
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All slots in display order.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        };
        write!(f, "{}", s)
    }
}

/// The four major Sunni schools of jurisprudence. Only the Asr shadow
/// length differs for prayer times (Hanafi uses twice the object length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Madhab {
    #[default]
    Shafi,
    Hanafi,
    Maliki,
    Hanbali,
}

impl fmt::Display for Madhab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Madhab::Shafi => "Shafi",
            Madhab::Hanafi => "Hanafi",
            Madhab::Maliki => "Maliki",
            Madhab::Hanbali => "Hanbali",
        };
        write!(f, "{}", s)
    }
}

/// Twilight angle conventions understood by the prayer-time library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// Fajr -18°, Isha -17°.
    #[default]
    MuslimWorldLeague,
    /// Fajr -19.5°, Isha -17.5°.
    Egyptian,
    /// Fajr -18°, Isha -18°.
    Karachi,
    /// Fajr -18.5°, Isha 90 minutes after Maghrib.
    UmmAlQura,
    /// Fajr -15°, Isha -15°.
    NorthAmerica,
    /// Fajr -20°, Isha -18°.
    Singapore,
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CalculationMethod::MuslimWorldLeague => "Muslim World League",
            CalculationMethod::Egyptian => "Egyptian General Authority of Survey",
            CalculationMethod::Karachi => "University of Islamic Sciences, Karachi",
            CalculationMethod::UmmAlQura => "Umm al-Qura University, Makkah",
            CalculationMethod::NorthAmerica => "Islamic Society of North America",
            CalculationMethod::Singapore => "Majlis Ugama Islam Singapura",
        };
        write!(f, "{}", s)
    }
}

/// Parameters handed to the prayer-time library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrayerParams {
    pub method: CalculationMethod,
    pub madhab: Madhab,
}

impl PrayerParams {
    pub fn new(method: CalculationMethod, madhab: Madhab) -> Self {
        Self { method, madhab }
    }

    /// Muslim World League with Shafi Asr.
    pub fn mwl() -> Self {
        Self::default()
    }

    /// Footer line shown under the prayer list.
    pub fn describe(&self) -> String {
        format!("Method: {} • Madhab: {}", self.method, self.madhab)
    }
}

/// One day of prayer times in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl PrayerTimes {
    pub fn time_of(&self, prayer: Prayer) -> DateTime<Utc> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Slots paired with their times, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, DateTime<Utc>)> + '_ {
        Prayer::ALL.into_iter().map(move |p| (p, self.time_of(p)))
    }

    /// First slot strictly after `now`, or `None` once Isha has passed.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<Prayer> {
        self.iter().find(|(_, t)| now < *t).map(|(p, _)| p)
    }
}

/// The astronomical prayer-time library.
pub trait PrayerTimesProvider: Send + Sync {
    fn compute(
        &self,
        date: NaiveDate,
        coords: GeoPoint,
        params: &PrayerParams,
    ) -> impl Future<Output = Result<PrayerTimes, HidayahError>> + Send;
}
