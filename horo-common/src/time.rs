//! Timestamp and calendar utilities

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in the local timezone
///
/// Readings are keyed by the calendar date the user sees, not the UTC date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `num_days_from_ce()` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Days elapsed since 1970-01-01 (negative before the epoch)
pub fn epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Monday on or before `date` (ISO week start)
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday closing the ISO week that contains `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// `days` before `date`, saturating at the earliest representable date
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", text, e)))
}
