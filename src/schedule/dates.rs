//! Execute date parsing.

use crate::error::{CronError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Naive date-time layouts, interpreted in the local time zone.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert an execute date to epoch milliseconds.
///
/// Accepted forms:
/// - RFC 3339 with an offset: `2024-02-19T23:46:50Z`, `2024-02-19T23:46:50+01:00`
/// - naive date-time in local time: `2024-02-19T23:46:50`, `2024-02-19 23:46`
/// - date only, midnight UTC: `2024-02-19`
/// - epoch milliseconds: `1708386410000`
pub fn parse_execute_date(input: &str) -> Result<i64> {
    let s = input.trim();
    let invalid = || CronError::InvalidDate(format!("'{}' is not a recognized date", input));

    let timestamp = if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<i64>().map_err(|_| invalid())?
    } else if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.timestamp_millis()
    } else if let Some(naive) = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
    {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                CronError::InvalidDate(format!("'{}' does not exist in the local time zone", input))
            })?
            .timestamp_millis()
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(invalid)?
            .and_utc()
            .timestamp_millis()
    } else {
        return Err(invalid());
    };

    if timestamp < 0 {
        return Err(CronError::InvalidDate(format!(
            "'{}' is before 1970-01-01",
            input
        )));
    }
    Ok(timestamp)
}
