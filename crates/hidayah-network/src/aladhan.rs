//! Hijri calendar over the Aladhan HTTP API.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use hidayah_calendar::{CalendarDay, HijriCalendarProvider, HijriDate, HijriMonth};
use hidayah_types::HidayahError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Public Aladhan endpoint.
pub const ALADHAN_BASE_URL: &str = "https://api.aladhan.com";

/// Default HTTP request timeout (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Date format used on both sides of the API.
const API_DATE_FORMAT: &str = "%d-%m-%Y";

pub(crate) const USER_AGENT: &str = concat!("hidayah/", env!("CARGO_PKG_VERSION"));

/// `{ code, status, data }` wrapper around every Aladhan response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: u16,
    status: String,
    data: Option<T>,
}

/// Aladhan sends some numbers as JSON strings and some as integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Text(String),
}

impl Numeric {
    fn parse<T>(&self, field: &str) -> Result<T, HidayahError>
    where
        T: FromStr + TryFrom<i64>,
    {
        let parsed = match self {
            Numeric::Int(n) => T::try_from(*n).ok(),
            Numeric::Text(s) => s.trim().parse().ok(),
        };
        parsed.ok_or_else(|| {
            HidayahError::NetworkError(format!(
                "Aladhan field {field} is not a valid number: {self:?}"
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiMonth {
    number: Numeric,
    en: String,
}

#[derive(Debug, Deserialize)]
struct ApiHijri {
    day: Numeric,
    month: ApiMonth,
    year: Numeric,
}

#[derive(Debug, Deserialize)]
struct ApiGregorian {
    date: String,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    hijri: ApiHijri,
    gregorian: ApiGregorian,
}

impl ApiHijri {
    fn into_date(self) -> Result<HijriDate, HidayahError> {
        Ok(HijriDate {
            day: self.day.parse("hijri.day")?,
            month: HijriMonth {
                number: self.month.number.parse("hijri.month.number")?,
                en: self.month.en,
            },
            year: self.year.parse("hijri.year")?,
        })
    }
}

impl ApiDay {
    fn into_calendar_day(self) -> Result<CalendarDay, HidayahError> {
        let gregorian =
            NaiveDate::parse_from_str(&self.gregorian.date, API_DATE_FORMAT).map_err(|e| {
                let context = format!("Aladhan gregorian date {:?}", self.gregorian.date);
                HidayahError::network(&context, e)
            })?;
        Ok(CalendarDay { gregorian, hijri: self.hijri.into_date()? })
    }
}

/// [`HijriCalendarProvider`] backed by the Aladhan API.
#[derive(Clone)]
pub struct AladhanClient {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for AladhanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AladhanClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AladhanClient {
    /// Client for the public endpoint.
    ///
    /// # Errors
    /// Returns `NetworkError` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, HidayahError> {
        Self::with_base_url(ALADHAN_BASE_URL)
    }

    /// Client for another deployment of the same API.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, HidayahError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HidayahError::network("Failed to create HTTP client", e))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, HidayahError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "aladhan request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| HidayahError::network("Aladhan request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HidayahError::NetworkError(format!("HTTP {} for {}", status, url)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| HidayahError::network("Failed to parse Aladhan response", e))?;

        envelope.data.ok_or_else(|| {
            HidayahError::NetworkError(format!(
                "Aladhan response without data (code {}, status {})",
                envelope.code, envelope.status
            ))
        })
    }
}

impl HijriCalendarProvider for AladhanClient {
    async fn today_hijri(&self, date: NaiveDate) -> Result<HijriDate, HidayahError> {
        let day: ApiDay = self
            .get("/v1/gToH", &[("date", date.format(API_DATE_FORMAT).to_string())])
            .await?;
        day.hijri.into_date()
    }

    async fn month(
        &self,
        year: i32,
        month: u32,
        adjustment: i32,
    ) -> Result<Vec<CalendarDay>, HidayahError> {
        let days: Vec<ApiDay> = self
            .get(
                &format!("/v1/hijriCalendar/{}/{}", year, month),
                &[("adjustment", adjustment.to_string())],
            )
            .await?;
        days.into_iter().map(ApiDay::into_calendar_day).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accepts_both_shapes() {
        let n: Numeric = serde_json::from_str("\"1445\"").unwrap();
        assert_eq!(n.parse::<i32>("year").unwrap(), 1445);
        let n: Numeric = serde_json::from_str("9").unwrap();
        assert_eq!(n.parse::<u32>("month").unwrap(), 9);
        let n: Numeric = serde_json::from_str("\"ninth\"").unwrap();
        assert!(n.parse::<u32>("month").is_err());
        let n: Numeric = serde_json::from_str("-1").unwrap();
        assert!(n.parse::<u32>("month").is_err());
    }

    #[test]
    fn test_day_parses_gregorian_dd_mm_yyyy() {
        let json = r#"{
            "hijri": {"day": "1", "month": {"number": 10, "en": "Shawwāl"}, "year": "1445"},
            "gregorian": {"date": "10-04-2024"}
        }"#;
        let day: ApiDay = serde_json::from_str(json).unwrap();
        let day = day.into_calendar_day().unwrap();
        assert_eq!(day.gregorian, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
        assert_eq!(day.hijri.month.number, 10);
        assert_eq!(day.hijri.year, 1445);
    }

    #[test]
    fn test_day_rejects_iso_date() {
        let json = r#"{
            "hijri": {"day": 1, "month": {"number": 10, "en": "Shawwal"}, "year": 1445},
            "gregorian": {"date": "2024-04-10"}
        }"#;
        let day: ApiDay = serde_json::from_str(json).unwrap();
        assert!(day.into_calendar_day().is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = AladhanClient::with_base_url("http://localhost:1234/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }
}
