//! Calendar dates and Unix-second conversions.
//!
//! All dates are interpreted as UTC calendar days.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{OrgcostError, Result};

/// Date format used on the command line and in daily points.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a `YYYY-MM-DD` pair.
    ///
    /// # Errors
    ///
    /// Returns [`OrgcostError::InvalidDateRange`] if either date is malformed.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse = |value: &str| {
            NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
                OrgcostError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                    reason: format!("'{value}': {e}"),
                }
            })
        };
        Ok(Self::new(parse(start)?, parse(end)?))
    }

    /// The `days` days leading up to and including `today`.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        Self::new(today - Duration::days(i64::from(days)), today)
    }

    /// Start of the range as Unix seconds (UTC midnight).
    #[must_use]
    pub fn start_timestamp(&self) -> i64 {
        day_start_timestamp(self.start)
    }

    /// End of the range as Unix seconds (UTC midnight of the end date).
    #[must_use]
    pub fn end_timestamp(&self) -> i64 {
        day_start_timestamp(self.end)
    }

    /// Every calendar day in `[start, end]`. Empty when `start > end`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), |day| day.succ_opt())
            .take_while(move |day| *day <= end)
    }

    /// `start` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Unix seconds of UTC midnight on `day`.
#[must_use]
pub fn day_start_timestamp(day: NaiveDate) -> i64 {
    day.and_hms_opt(0, 0, 0)
        .map_or(0, |midnight| midnight.and_utc().timestamp())
}

/// Calendar date (`YYYY-MM-DD`) containing the Unix timestamp.
///
/// Returns `None` if the timestamp is outside chrono's representable range.
#[must_use]
pub fn date_of_timestamp(seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Today's UTC calendar date.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
