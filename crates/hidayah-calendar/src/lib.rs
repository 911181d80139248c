//! Hijri calendar for hidayah.
//!
//! Month data comes from a [`HijriCalendarProvider`]; this crate lays it out
//! as Sunday-first week rows and walks month to month.

pub mod browser;
pub mod grid;
pub mod provider;
pub mod types;

pub use browser::{CalendarBrowser, MAX_ADJUSTMENT};
pub use grid::{CalendarMonth, MonthCursor, WEEK_LEN, WeekRow, is_today};
pub use provider::HijriCalendarProvider;
pub use types::{CalendarDay, HijriDate, HijriMonth, hijri_month_name};
