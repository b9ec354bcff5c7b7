//! Lockcron: filesystem-backed cron for interval and one-shot schedules.
//!
//! Schedules are files in a shared lock directory, named after their execute
//! timestamp, ufid and (for recurring schedules) interval. A polling loop fires
//! the due ones, using the atomic unlink of the lock file as the claim, so an
//! occurrence fires at most once across every process sharing the directory.
//!
//! Most callers only need [`schedule::Cron`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod locks;
pub mod registry;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{CronError, Result};
pub use schedule::{Cron, IntervalSpec, ScheduleRequest};
