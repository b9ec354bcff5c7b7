//! Lock entry definition and its filename codec.
//!
//! A lock's filename is its identity:
//! - term lock: `<executeTimestamp>-<ufid>`
//! - interval lock: `<executeTimestamp>-<ufid>-<intervalTimestamp>`
//!
//! Timestamps are epoch milliseconds. The ufid alphabet excludes the `-`
//! separator, so every valid entry decodes back to itself.

use crate::error::{CronError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Separator between the fields of an encoded lock name.
pub const SEPARATOR: char = '-';

static UFID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("Invalid ufid regex"));

// Up to 19 digits; values past i64::MAX fail the parse in `decode`.
static LOCK_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9]\d{0,18})-([A-Za-z0-9_.]+)(?:-([1-9]\d{0,18}))?$")
        .expect("Invalid lock name regex")
});

/// Check that a ufid can be encoded into a lock filename.
pub fn validate_ufid(ufid: &str) -> Result<()> {
    if UFID_REGEX.is_match(ufid) {
        Ok(())
    } else {
        Err(CronError::InvalidUfid(ufid.to_string()))
    }
}

/// Kind of schedule occurrence a lock represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    /// One-shot occurrence at an absolute date.
    Term,
    /// Recurring occurrence, re-armed after each fire.
    Interval,
}

impl LockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockKind::Term => "term",
            LockKind::Interval => "interval",
        }
    }
}

/// A pending schedule occurrence, as recorded in the lock directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockEntry {
    /// When the occurrence is due (epoch milliseconds).
    pub execute_timestamp: i64,

    /// The ufid whose callback fires.
    pub ufid: String,

    /// Period in milliseconds; present only on interval locks.
    pub interval_timestamp: Option<i64>,
}

impl LockEntry {
    /// A one-shot lock.
    pub fn term(ufid: impl Into<String>, execute_timestamp: i64) -> Self {
        Self {
            execute_timestamp,
            ufid: ufid.into(),
            interval_timestamp: None,
        }
    }

    /// A recurring lock.
    pub fn interval(
        ufid: impl Into<String>,
        execute_timestamp: i64,
        interval_timestamp: i64,
    ) -> Self {
        Self {
            execute_timestamp,
            ufid: ufid.into(),
            interval_timestamp: Some(interval_timestamp),
        }
    }

    pub fn kind(&self) -> LockKind {
        if self.interval_timestamp.is_some() {
            LockKind::Interval
        } else {
            LockKind::Term
        }
    }

    pub fn is_interval(&self) -> bool {
        self.interval_timestamp.is_some()
    }

    /// The same schedule moved to `execute_timestamp`.
    pub fn rescheduled(&self, execute_timestamp: i64) -> Self {
        Self {
            execute_timestamp,
            ..self.clone()
        }
    }

    /// Encode this entry as its lock filename.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a lock filename. Returns `None` for names this codec did not produce.
    pub fn decode(name: &str) -> Option<Self> {
        let caps = LOCK_NAME_REGEX.captures(name)?;
        let execute_timestamp = caps.get(1)?.as_str().parse().ok()?;
        let ufid = caps.get(2)?.as_str().to_string();
        let interval_timestamp = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        Some(Self {
            execute_timestamp,
            ufid,
            interval_timestamp,
        })
    }
}

impl fmt::Display for LockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interval_timestamp {
            Some(interval) => write!(
                f,
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                self.execute_timestamp, self.ufid, interval
            ),
            None => write!(f, "{}{SEPARATOR}{}", self.execute_timestamp, self.ufid),
        }
    }
}
