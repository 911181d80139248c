//! Month grid layout and month navigation.

use chrono::{Datelike, NaiveDate};
use hidayah_types::HidayahError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{CalendarDay, HIJRI_MAX_MONTH, HIJRI_MIN_MONTH};

/// Days in a week row.
pub const WEEK_LEN: usize = 7;

/// One row of the month view, Sunday first. `None` is a blank leading cell.
pub type WeekRow<'a> = SmallVec<[Option<&'a CalendarDay>; WEEK_LEN]>;

/// All days of one Hijri month, ordered by Gregorian date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarMonth {
    days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Builds a month from provider output; the order of `days` does not matter.
    pub fn new(mut days: Vec<CalendarDay>) -> Self {
        days.sort_by_key(|d| d.gregorian);
        Self { days }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// "Ramadhan 1445" from the first day, or empty for an empty month.
    pub fn header_label(&self) -> String {
        self.days
            .first()
            .map(|d| format!("{} {}", d.hijri.month.en, d.hijri.year))
            .unwrap_or_default()
    }

    /// Lays the month out in Sunday-first rows of seven.
    ///
    /// The first row is padded with blanks up to the weekday of the first
    /// day. The last row is not padded.
    pub fn weeks(&self) -> Vec<WeekRow<'_>> {
        let Some(first) = self.days.first() else {
            return Vec::new();
        };
        let lead = first.gregorian.weekday().num_days_from_sunday() as usize;

        let cells: Vec<Option<&CalendarDay>> = std::iter::repeat_n(None, lead)
            .chain(self.days.iter().map(Some))
            .collect();

        cells.chunks(WEEK_LEN).map(|row| row.iter().copied().collect()).collect()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.gregorian == date)
    }
}

/// Returns true when `day` falls on `today`.
pub fn is_today(day: &CalendarDay, today: NaiveDate) -> bool {
    day.gregorian == today
}

/// Position in the Hijri calendar, one month at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    /// # Errors
    /// Returns `InvalidConfiguration` when `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, HidayahError> {
        if !(HIJRI_MIN_MONTH..=HIJRI_MAX_MONTH).contains(&month) {
            return Err(HidayahError::invalid_config(format!(
                "Hijri month {} outside 1..=12",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn prev(self) -> Self {
        if self.month == HIJRI_MIN_MONTH {
            Self { year: self.year - 1, month: HIJRI_MAX_MONTH }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    pub fn next(self) -> Self {
        if self.month == HIJRI_MAX_MONTH {
            Self { year: self.year + 1, month: HIJRI_MIN_MONTH }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HijriDate, HijriMonth};

    fn day(y: i32, m: u32, d: u32, hijri_day: u32) -> CalendarDay {
        CalendarDay {
            gregorian: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            hijri: HijriDate { day: hijri_day, month: HijriMonth::from_number(9), year: 1445 },
        }
    }

    /// Ramadhan 1445: 11 March 2024 (a Monday) to 9 April 2024.
    fn ramadhan_1445() -> CalendarMonth {
        let start = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let days = (0..30)
            .rev()
            .map(|i| {
                let g = start + chrono::Duration::days(i);
                day(g.year(), g.month(), g.day(), i as u32 + 1)
            })
            .collect();
        CalendarMonth::new(days)
    }

    #[test]
    fn test_new_sorts_by_gregorian() {
        let month = ramadhan_1445();
        assert_eq!(month.days()[0].hijri.day, 1);
        assert_eq!(month.days()[29].hijri.day, 30);
    }

    #[test]
    fn test_weeks_pad_leading_blanks() {
        let month = ramadhan_1445();
        let weeks = month.weeks();
        // Monday start: one blank, then 30 days => 31 cells => 5 rows.
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][0].is_none());
        assert_eq!(weeks[0][1].map(|d| d.hijri.day), Some(1));
        assert!(weeks[..4].iter().all(|w| w.len() == WEEK_LEN));
        assert_eq!(weeks[4].len(), 3);
    }

    #[test]
    fn test_empty_month() {
        let month = CalendarMonth::default();
        assert!(month.weeks().is_empty());
        assert_eq!(month.header_label(), "");
    }

    #[test]
    fn test_header_label_and_today() {
        let month = ramadhan_1445();
        assert_eq!(month.header_label(), "Ramadhan 1445");
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let hit = month.find(today).unwrap();
        assert!(is_today(hit, today));
        assert_eq!(hit.hijri.day, 5);
    }

    #[test]
    fn test_cursor_wraps_year() {
        let c = MonthCursor::new(1445, 1).unwrap();
        assert_eq!(c.prev(), MonthCursor { year: 1444, month: 12 });
        let c = MonthCursor::new(1445, 12).unwrap();
        assert_eq!(c.next(), MonthCursor { year: 1446, month: 1 });
        assert_eq!(MonthCursor::new(1445, 5).unwrap().next().prev().month, 5);
    }

    #[test]
    fn test_cursor_rejects_bad_month() {
        assert!(MonthCursor::new(1445, 0).is_err());
        assert!(MonthCursor::new(1445, 13).is_err());
    }
}
