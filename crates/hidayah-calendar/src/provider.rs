use chrono::NaiveDate;
use hidayah_types::HidayahError;
use std::future::Future;

use crate::types::{CalendarDay, HijriDate};

/// Remote Hijri calendar service.
///
/// Conversion is never done locally; a provider answers both questions the
/// calendar screen asks.
pub trait HijriCalendarProvider: Send + Sync {
    /// Hijri date corresponding to a Gregorian date.
    fn today_hijri(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HijriDate, HidayahError>> + Send;

    /// Every day of a Hijri month. `adjustment` shifts the month by whole
    /// days to follow local moon sighting.
    fn month(
        &self,
        year: i32,
        month: u32,
        adjustment: i32,
    ) -> impl Future<Output = Result<Vec<CalendarDay>, HidayahError>> + Send;
}
