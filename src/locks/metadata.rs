//! Diagnostic metadata written into lock files.
//!
//! Scheduling never reads this back: a lock's meaning lives entirely in its
//! filename. The content only tells a human who created the file and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Metadata stored in lock files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Creator of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the creating scheduler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// When the lock file was written (RFC3339).
    pub created_at: DateTime<Utc>,
}

impl LockMetadata {
    /// Create new lock metadata with the current timestamp.
    pub fn new() -> Self {
        Self {
            owner: get_owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
        }
    }

    /// Best-effort read of a lock file's metadata.
    ///
    /// Lock content is informational, so unreadable or foreign content yields `None`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Option<Self> {
        let content = fs::read_to_string(path.as_ref()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Serialize lock metadata to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for LockMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the owner string for lock metadata and journal events.
pub(crate) fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
