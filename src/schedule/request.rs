//! Schedule requests and interval units.

use crate::error::{CronError, Result};
use std::fmt;
use std::str::FromStr;

/// Supported interval units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Parse a unit code: `m`, `h` or `d`.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "m" => Ok(Self::Minutes),
            "h" => Ok(Self::Hours),
            "d" => Ok(Self::Days),
            other => Err(CronError::InvalidTimeUnit(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
        }
    }

    pub fn millis(&self) -> i64 {
        match self {
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }
}

/// An interval as given by a collaborator: a count and a unit code.
///
/// The unit is kept as given and checked when the schedule is created, so an
/// unsupported unit fails `create_schedule` before any lock is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSpec {
    pub time_unit: String,
    pub value: u64,
}

impl IntervalSpec {
    pub fn new(time_unit: impl Into<String>, value: u64) -> Self {
        Self {
            time_unit: time_unit.into(),
            value,
        }
    }

    pub fn minutes(value: u64) -> Self {
        Self::new("m", value)
    }

    pub fn hours(value: u64) -> Self {
        Self::new("h", value)
    }

    pub fn days(value: u64) -> Self {
        Self::new("d", value)
    }

    /// Interval length in milliseconds.
    pub fn to_millis(&self) -> Result<i64> {
        let unit = TimeUnit::from_code(&self.time_unit)?;
        if self.value == 0 {
            return Err(CronError::InvalidInterval(
                "interval value must be greater than 0".to_string(),
            ));
        }
        i64::try_from(self.value)
            .ok()
            .and_then(|value| value.checked_mul(unit.millis()))
            .ok_or_else(|| CronError::InvalidInterval(format!("interval {} is too large", self)))
    }
}

impl fmt::Display for IntervalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.time_unit)
    }
}

/// Parses the compact `<value><unit>` form, e.g. `1m`, `12h`, `7d`.
impl FromStr for IntervalSpec {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        if digits.is_empty() {
            return Err(CronError::InvalidInterval(format!(
                "'{}' does not start with a number (expected e.g. 1m, 2h, 1d)",
                s
            )));
        }
        let value = digits
            .parse()
            .map_err(|_| CronError::InvalidInterval(format!("'{}' is too large", digits)))?;
        Ok(Self::new(unit, value))
    }
}

/// Arguments of `create_schedule`.
///
/// With an interval the schedule is recurring and `execute_date` is the first
/// fire (defaulting to a few ticks from now). Without one it is a term
/// schedule and `execute_date` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub ufid: String,
    pub execute_date: Option<String>,
    pub interval: Option<IntervalSpec>,
}

impl ScheduleRequest {
    /// A recurring schedule whose first fire is picked by the scheduler.
    pub fn interval(ufid: impl Into<String>, interval: IntervalSpec) -> Self {
        Self {
            ufid: ufid.into(),
            execute_date: None,
            interval: Some(interval),
        }
    }

    /// A one-shot schedule at `execute_date`.
    pub fn term(ufid: impl Into<String>, execute_date: impl Into<String>) -> Self {
        Self {
            ufid: ufid.into(),
            execute_date: Some(execute_date.into()),
            interval: None,
        }
    }

    /// Set the (first) execute date.
    pub fn starting_at(mut self, execute_date: impl Into<String>) -> Self {
        self.execute_date = Some(execute_date.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table() {
        assert_eq!(IntervalSpec::minutes(1).to_millis().unwrap(), 60_000);
        assert_eq!(IntervalSpec::hours(2).to_millis().unwrap(), 7_200_000);
        assert_eq!(IntervalSpec::days(1).to_millis().unwrap(), 86_400_000);
    }

    #[test]
    fn test_unsupported_unit() {
        for unit in ["s", "", "M", "min", "w"] {
            let err = IntervalSpec::new(unit, 1).to_millis().unwrap_err();
            assert!(matches!(err, CronError::InvalidTimeUnit(ref u) if u == unit));
        }
    }

    #[test]
    fn test_zero_and_overflowing_values() {
        assert!(matches!(
            IntervalSpec::minutes(0).to_millis().unwrap_err(),
            CronError::InvalidInterval(_)
        ));
        assert!(matches!(
            IntervalSpec::days(u64::MAX).to_millis().unwrap_err(),
            CronError::InvalidInterval(_)
        ));
    }

    #[test]
    fn test_parse_compact_form() {
        assert_eq!("1m".parse::<IntervalSpec>().unwrap(), IntervalSpec::minutes(1));
        assert_eq!(" 12h ".parse::<IntervalSpec>().unwrap(), IntervalSpec::hours(12));
        // Unit checked later, at schedule creation.
        assert_eq!("30s".parse::<IntervalSpec>().unwrap(), IntervalSpec::new("s", 30));
        assert!("m".parse::<IntervalSpec>().is_err());
        assert_eq!(IntervalSpec::days(7).to_string(), "7d");
    }

    #[test]
    fn test_request_builders() {
        let request = ScheduleRequest::interval("a", IntervalSpec::minutes(5))
            .starting_at("2024-02-19T23:46:50Z");
        assert_eq!(request.execute_date.as_deref(), Some("2024-02-19T23:46:50Z"));
        assert!(request.interval.is_some());

        let term = ScheduleRequest::term("a", "2024-02-21T23:46:50");
        assert!(term.interval.is_none());
    }
}
