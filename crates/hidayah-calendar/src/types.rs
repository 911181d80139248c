use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum Hijri month number.
pub const HIJRI_MIN_MONTH: u32 = 1;
/// Maximum Hijri month number.
pub const HIJRI_MAX_MONTH: u32 = 12;

/// Returns Hijri month name.
pub fn hijri_month_name(month: u32) -> &'static str {
    match month {
        1 => "Muharram",
        2 => "Safar",
        3 => "Rabi' al-Awwal",
        4 => "Rabi' al-Thani",
        5 => "Jumada al-Ula",
        6 => "Jumada al-Akhirah",
        7 => "Rajab",
        8 => "Sha'ban",
        9 => "Ramadhan",
        10 => "Shawwal",
        11 => "Dhu al-Qi'dah",
        12 => "Dhu al-Hijjah",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriMonth {
    /// 1 = Muharram … 12 = Dhu al-Hijjah.
    pub number: u32,
    /// English name as reported by the provider (transliterations vary).
    pub en: String,
}

impl HijriMonth {
    /// Month with the canonical English name.
    pub fn from_number(number: u32) -> Self {
        Self { number, en: hijri_month_name(number).to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u32,
    pub month: HijriMonth,
    pub year: i32,
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month.en, self.year)
    }
}

/// One cell of a month view: a Gregorian day and its Hijri counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub gregorian: NaiveDate,
    pub hijri: HijriDate,
}
