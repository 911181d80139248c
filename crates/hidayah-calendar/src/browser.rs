//! Month-by-month calendar browsing.

use chrono::NaiveDate;
use hidayah_types::HidayahError;
use tracing::{debug, warn};

use crate::grid::{CalendarMonth, MonthCursor};
use crate::provider::HijriCalendarProvider;

/// Largest accepted moon sighting adjustment, in days.
pub const MAX_ADJUSTMENT: i32 = 30;

/// Drives the calendar screen: find the current Hijri month, load it, step
/// backwards and forwards.
///
/// Navigation before a successful [`bootstrap`](Self::bootstrap) is a no-op.
/// A failed load clears the displayed month but keeps the cursor, so
/// [`load`](Self::load) can be retried.
#[derive(Debug)]
pub struct CalendarBrowser<P> {
    provider: P,
    adjustment: i32,
    cursor: Option<MonthCursor>,
    month: Option<CalendarMonth>,
}

impl<P: HijriCalendarProvider> CalendarBrowser<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            adjustment: 0,
            cursor: None,
            month: None,
        }
    }

    /// Day offset passed to the provider. Clamped to [-30, 30].
    pub fn adjustment(mut self, adjustment: i32) -> Self {
        self.adjustment = adjustment.clamp(-MAX_ADJUSTMENT, MAX_ADJUSTMENT);
        self
    }

    pub fn cursor(&self) -> Option<MonthCursor> {
        self.cursor
    }

    pub fn current(&self) -> Option<&CalendarMonth> {
        self.month.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves today's Hijri month and loads it.
    ///
    /// # Errors
    /// `Calendar("Could not detect Hijri date…")` if the lookup fails, or
    /// whatever the month load returns.
    pub async fn bootstrap(&mut self, today: NaiveDate) -> Result<&CalendarMonth, HidayahError> {
        let hijri = self.provider.today_hijri(today).await.map_err(|e| {
            warn!(%today, error = %e, "hijri date lookup failed");
            HidayahError::Calendar(format!("Could not detect Hijri date: {}", e))
        })?;
        debug!(%today, %hijri, "hijri date detected");
        self.cursor = Some(MonthCursor::new(hijri.year, hijri.month.number)?);
        self.load().await
    }

    /// Fetches the month under the cursor.
    pub async fn load(&mut self) -> Result<&CalendarMonth, HidayahError> {
        let cursor = self
            .cursor
            .ok_or_else(|| HidayahError::Calendar("calendar not bootstrapped".to_string()))?;

        match self.provider.month(cursor.year, cursor.month, self.adjustment).await {
            Ok(days) => {
                debug!(
                    year = cursor.year,
                    month = cursor.month,
                    days = days.len(),
                    "hijri month loaded"
                );
                Ok(&*self.month.insert(CalendarMonth::new(days)))
            }
            Err(e) => {
                warn!(
                    year = cursor.year,
                    month = cursor.month,
                    error = %e,
                    "failed to load Islamic calendar"
                );
                self.month = None;
                Err(e)
            }
        }
    }

    /// Moves one month back and loads it. `Ok(None)` before bootstrap.
    pub async fn prev(&mut self) -> Result<Option<&CalendarMonth>, HidayahError> {
        self.step(MonthCursor::prev).await
    }

    /// Moves one month forward and loads it. `Ok(None)` before bootstrap.
    pub async fn next(&mut self) -> Result<Option<&CalendarMonth>, HidayahError> {
        self.step(MonthCursor::next).await
    }

    async fn step(
        &mut self,
        advance: fn(MonthCursor) -> MonthCursor,
    ) -> Result<Option<&CalendarMonth>, HidayahError> {
        let Some(cursor) = self.cursor else {
            return Ok(None);
        };
        self.cursor = Some(advance(cursor));
        self.load().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CalendarDay, HijriDate, HijriMonth};
    use std::sync::Mutex;

    /// Answers from a fixed table and records every month request.
    #[derive(Debug, Default)]
    struct FakeProvider {
        today: Option<(i32, u32)>,
        fail_months: bool,
        requests: Mutex<Vec<(i32, u32, i32)>>,
    }

    impl HijriCalendarProvider for FakeProvider {
        async fn today_hijri(&self, _date: NaiveDate) -> Result<HijriDate, HidayahError> {
            self.today
                .map(|(year, month)| HijriDate {
                    day: 4,
                    month: HijriMonth::from_number(month),
                    year,
                })
                .ok_or_else(|| HidayahError::NetworkError("offline".to_string()))
        }

        async fn month(
            &self,
            year: i32,
            month: u32,
            adjustment: i32,
        ) -> Result<Vec<CalendarDay>, HidayahError> {
            self.requests.lock().unwrap().push((year, month, adjustment));
            if self.fail_months {
                return Err(HidayahError::NetworkError("503".to_string()));
            }
            let first = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
            Ok((0..29)
                .map(|i| CalendarDay {
                    gregorian: first + chrono::Duration::days(i),
                    hijri: HijriDate {
                        day: i as u32 + 1,
                        month: HijriMonth::from_number(month),
                        year,
                    },
                })
                .collect())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_then_navigate() {
        let provider = FakeProvider { today: Some((1445, 12)), ..Default::default() };
        let mut browser = CalendarBrowser::new(provider).adjustment(1);

        let month = browser.bootstrap(today()).await.unwrap();
        assert_eq!(month.header_label(), "Dhu al-Hijjah 1445");

        let next = browser.next().await.unwrap().unwrap();
        assert_eq!(next.header_label(), "Muharram 1446");

        browser.prev().await.unwrap();
        browser.prev().await.unwrap();
        assert_eq!(browser.cursor(), Some(MonthCursor { year: 1445, month: 11 }));

        let requests = browser.provider().requests.lock().unwrap().clone();
        assert_eq!(requests, vec![(1445, 12, 1), (1446, 1, 1), (1445, 12, 1), (1445, 11, 1)]);
    }

    #[tokio::test]
    async fn test_navigation_before_bootstrap_is_noop() {
        let mut browser = CalendarBrowser::new(FakeProvider::default());
        assert!(browser.next().await.unwrap().is_none());
        assert!(browser.prev().await.unwrap().is_none());
        assert!(browser.load().await.is_err());
        assert!(browser.provider().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_failure_message() {
        let mut browser = CalendarBrowser::new(FakeProvider::default());
        let err = browser.bootstrap(today()).await.unwrap_err();
        assert!(err.to_string().contains("Could not detect Hijri date"));
        assert!(browser.cursor().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_clears_month_keeps_cursor() {
        let provider = FakeProvider {
            today: Some((1445, 9)),
            fail_months: true,
            ..Default::default()
        };
        let mut browser = CalendarBrowser::new(provider);
        assert!(browser.bootstrap(today()).await.is_err());
        assert!(browser.current().is_none());
        assert_eq!(browser.cursor(), Some(MonthCursor { year: 1445, month: 9 }));
    }

    #[test]
    fn test_adjustment_is_clamped() {
        let browser = CalendarBrowser::new(FakeProvider::default()).adjustment(99);
        assert_eq!(browser.adjustment, MAX_ADJUSTMENT);
    }
}
