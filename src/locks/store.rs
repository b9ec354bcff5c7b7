//! Directory-backed storage of lock entries.

use super::metadata::LockMetadata;
use super::types::LockEntry;
use crate::error::{CronError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// The lock directory: one file per pending occurrence.
///
/// Deleting a lock file is the claim operation that decides which tick (or
/// which process sharing the directory) fires an occurrence.
#[derive(Debug, Clone)]
pub struct LockStore {
    dir: PathBuf,
}

impl LockStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the lock files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the lock directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| CronError::io("failed to create lock directory", &self.dir, e))
    }

    /// Absolute path of the file backing `entry`.
    pub fn path_for(&self, entry: &LockEntry) -> PathBuf {
        self.dir.join(entry.encode())
    }

    /// Enumerate and decode every lock in the directory.
    ///
    /// Entries whose names do not decode are skipped with a warning. The
    /// result is sorted by execute timestamp, then ufid.
    pub fn list_all(&self) -> Result<Vec<LockEntry>> {
        let read_dir = fs::read_dir(&self.dir)
            .map_err(|e| CronError::io("failed to read lock directory", &self.dir, e))?;

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry
                .map_err(|e| CronError::io("failed to read lock directory entry", &self.dir, e))?;

            if dir_entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }

            let file_name = dir_entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::warn!(
                    dir = %self.dir.display(),
                    "skipping non UTF-8 entry in lock directory"
                );
                continue;
            };

            match LockEntry::decode(name) {
                Some(entry) => entries.push(entry),
                None => {
                    tracing::warn!(
                        lock = name,
                        dir = %self.dir.display(),
                        "skipping unrecognized entry in lock directory"
                    );
                }
            }
        }

        entries.sort_by(|a, b| {
            a.execute_timestamp
                .cmp(&b.execute_timestamp)
                .then_with(|| a.ufid.cmp(&b.ufid))
        });
        Ok(entries)
    }

    /// Write a new lock file for `entry`.
    ///
    /// Uniqueness of the schedule is the caller's concern; this only refuses to
    /// overwrite a file that already carries the same name.
    pub fn create(&self, entry: &LockEntry) -> Result<()> {
        let path = self.path_for(entry);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| CronError::io("failed to create lock file", &path, e))?;

        let json = LockMetadata::new().to_json().unwrap_or_default();
        if let Err(e) = file.write_all(json.as_bytes()) {
            let _ = fs::remove_file(&path);
            return Err(CronError::io("failed to write lock file", &path, e));
        }

        Ok(())
    }

    /// Remove the lock file for `entry`.
    ///
    /// Returns `LockAlreadyClaimed` if the file is gone, which means another
    /// tick or another process got to it first.
    pub fn delete(&self, entry: &LockEntry) -> Result<()> {
        let path = self.path_for(entry);
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CronError::LockAlreadyClaimed(entry.encode())
            } else {
                CronError::io("failed to delete lock file", &path, e)
            }
        })
    }

    /// The interval lock for `ufid`, if one exists.
    pub fn find_interval(&self, ufid: &str) -> Result<Option<LockEntry>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|entry| entry.ufid == ufid && entry.is_interval()))
    }

    /// The lock for `ufid` due exactly at `execute_timestamp`, if one exists.
    pub fn find_at(&self, ufid: &str, execute_timestamp: i64) -> Result<Option<LockEntry>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|entry| entry.ufid == ufid && entry.execute_timestamp == execute_timestamp))
    }
}
