//! Error types for lockcron.
//!
//! Uses thiserror for derive macros. Validation errors are returned to the
//! caller of the scheduling API; `LockAlreadyClaimed` is internal to the tick
//! loop and never escapes it.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scheduler operations.
#[derive(Error, Debug)]
pub enum CronError {
    /// No callback is registered under this ufid.
    #[error("no activate function is registered for ufid '{0}'")]
    UnknownUfid(String),

    /// A callback is already registered under this ufid.
    #[error("an activate function is already registered for ufid '{0}'")]
    DuplicateUfid(String),

    /// Some lock already exists for this ufid, so an interval cannot be created.
    #[error("a lock for ufid '{0}' already exists; remove it before creating an interval")]
    IntervalAlreadyExists(String),

    /// A term lock with the same ufid and execute timestamp already exists.
    #[error("a term lock for ufid '{ufid}' at {execute_timestamp} already exists")]
    TermAlreadyExists { ufid: String, execute_timestamp: i64 },

    /// Interval unit outside the supported table.
    #[error("invalid time unit '{0}': use 'm' for minutes, 'h' for hours, or 'd' for days")]
    InvalidTimeUnit(String),

    /// Interval value that yields no usable period.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Ufid that cannot be encoded into a lock filename.
    #[error(
        "invalid ufid '{0}': use a non-empty name of ASCII letters, digits, '_' or '.' (no '-')"
    )]
    InvalidUfid(String),

    /// Missing execute date, or one that no supported format accepts.
    #[error("invalid execute date: {0}")]
    InvalidDate(String),

    /// Lock directory I/O failure.
    #[error("{context} '{}': {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lock was already removed; another tick or process claimed it.
    #[error("lock '{0}' was already claimed")]
    LockAlreadyClaimed(String),

    /// Configuration could not be read, parsed or validated.
    #[error("{0}")]
    Config(String),
}

impl CronError {
    /// Build an `Io` error for an operation on `path`.
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CronError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CronError::UnknownUfid(_)
            | CronError::DuplicateUfid(_)
            | CronError::InvalidTimeUnit(_)
            | CronError::InvalidInterval(_)
            | CronError::InvalidUfid(_)
            | CronError::InvalidDate(_)
            | CronError::Config(_) => exit_codes::USER_ERROR,
            CronError::IntervalAlreadyExists(_) | CronError::TermAlreadyExists { .. } => {
                exit_codes::SCHEDULE_CONFLICT
            }
            CronError::Io { .. } | CronError::LockAlreadyClaimed(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for lockcron operations.
pub type Result<T> = std::result::Result<T, CronError>;
