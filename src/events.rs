//! Event journal for lockcron.
//!
//! When `events_file` is configured, the scheduler appends one JSON object
//! per line (NDJSON) for everything it does to the lock directory: schedules
//! created and removed, occurrences fired and re-armed, stale interval locks
//! reconciled, claims lost to another process, and lock writes that failed.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`fired`, `rearmed`, `claim_lost`, ...)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `ufid`: the ufid involved, when there is one
//! - `details`: freeform object with action-specific fields
//!
//! The journal is an observation channel only. A failed append is logged and
//! never changes what the scheduler does.

use crate::error::{CronError, Result};
use crate::locks::{LockEntry, get_owner_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be journaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A schedule was created through the API.
    ScheduleCreate,
    /// A schedule was removed through the API.
    ScheduleRemove,
    /// A claimed occurrence invoked its callback.
    Fired,
    /// An interval lock was written for its next occurrence.
    Rearmed,
    /// A stale interval lock was moved into the future after a restart.
    Reconciled,
    /// A due lock was already gone; another tick or process fired it.
    ClaimLost,
    /// A claimed occurrence had no registered callback.
    UnknownUfid,
    /// Writing a lock file failed and the schedule was not persisted.
    CreateFailed,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventAction::ScheduleCreate => "schedule_create",
            EventAction::ScheduleRemove => "schedule_remove",
            EventAction::Fired => "fired",
            EventAction::Rearmed => "rearmed",
            EventAction::Reconciled => "reconciled",
            EventAction::ClaimLost => "claim_lost",
            EventAction::UnknownUfid => "unknown_ufid",
            EventAction::CreateFailed => "create_failed",
        };
        f.write_str(name)
    }
}

/// A journal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    pub actor: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ufid: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_owner_string(),
            ufid: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// An event about a specific lock entry; `details` carries its fields.
    pub fn for_lock(action: EventAction, entry: &LockEntry) -> Self {
        Self::new(action).with_ufid(&entry.ufid).with_details(json!({
            "lock": entry.encode(),
            "execute_timestamp": entry.execute_timestamp,
            "interval_timestamp": entry.interval_timestamp,
        }))
    }

    pub fn with_ufid(mut self, ufid: impl Into<String>) -> Self {
        self.ufid = Some(ufid.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Merge `key: value` into the details object.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.details {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CronError::Config(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append-only NDJSON journal. Disabled when constructed without a path.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    path: Option<PathBuf>,
}

impl EventJournal {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append `event` as one line, creating the file and its directory as needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| CronError::io("failed to create events directory", parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CronError::io("failed to open events file", path, e))?;

        writeln!(file, "{}", json_line)
            .map_err(|e| CronError::io("failed to write event", path, e))?;

        Ok(())
    }

    /// Append `event`, logging instead of returning a failure.
    pub fn record(&self, event: Event) {
        if let Err(e) = self.append(&event) {
            tracing::warn!(action = %event.action, error = %e, "failed to journal event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Fired);

        assert_eq!(event.action, EventAction::Fired);
        assert!(!event.actor.is_empty());
        assert!(event.ufid.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_for_lock() {
        let entry = LockEntry::interval("report", 1_000, 60_000);
        let event = Event::for_lock(EventAction::Rearmed, &entry).with_detail("previous", 940);

        assert_eq!(event.ufid.as_deref(), Some("report"));
        assert_eq!(event.details["lock"], "1000-report-60000");
        assert_eq!(event.details["interval_timestamp"], 60_000);
        assert_eq!(event.details["previous"], 940);
    }

    #[test]
    fn test_event_without_ufid_omits_field() {
        let line = Event::new(EventAction::CreateFailed).to_ndjson_line().unwrap();
        assert!(!line.contains("\"ufid\""));
        assert!(line.contains("\"create_failed\""));
    }

    #[test]
    fn test_event_action_display_matches_serde() {
        for action in [
            EventAction::ScheduleCreate,
            EventAction::ScheduleRemove,
            EventAction::Fired,
            EventAction::Rearmed,
            EventAction::Reconciled,
            EventAction::ClaimLost,
            EventAction::UnknownUfid,
            EventAction::CreateFailed,
        ] {
            let serialized = serde_json::to_string(&action).unwrap();
            assert_eq!(serialized, format!("\"{}\"", action));
        }
    }

    #[test]
    fn test_append_creates_file_and_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("journal").join("events.ndjson");
        let journal = EventJournal::new(Some(path.clone()));

        journal
            .append(&Event::for_lock(EventAction::Fired, &LockEntry::term("a", 1)))
            .unwrap();
        journal
            .append(&Event::for_lock(EventAction::Fired, &LockEntry::term("b", 2)))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));

        let second: Event = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.action, EventAction::Fired);
        assert_eq!(second.ufid.as_deref(), Some("b"));
    }

    #[test]
    fn test_disabled_journal_writes_nothing() {
        let journal = EventJournal::disabled();
        assert!(journal.path().is_none());
        journal.append(&Event::new(EventAction::Fired)).unwrap();
    }
}
