//! Trailing statistics window
//!
//! Both ends come from the same calendar date, so the window is always
//! exactly `STATS_WINDOW_DAYS` days wide whatever the time of day or offset.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use esp_client::DateRange;

pub const STATS_WINDOW_DAYS: u64 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl StatsWindow {
    /// Window ending on `today`.
    pub fn ending_on(today: NaiveDate) -> Self {
        Self {
            from: today - Days::new(STATS_WINDOW_DAYS),
            to: today,
        }
    }

    /// Window ending on the calendar date of `at` in its own timezone.
    pub fn ending_at<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::ending_on(at.date_naive())
    }

    /// Window ending today (UTC).
    pub fn current() -> Self {
        Self::ending_at(&Utc::now())
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Query parameters for the statistics endpoints.
    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from.format(DATE_FORMAT).to_string(),
            to: self.to.format(DATE_FORMAT).to_string(),
        }
    }
}
