//! Atomic file replacement.
//!
//! Content is written to a temporary sibling, synced, and renamed over the
//! target, so readers see either the old file or the complete new one. The
//! rename is atomic only when both paths are on the same filesystem, which
//! holds because the temporary file lives next to the target.
//!
//! `std::fs::rename` replaces an existing target on every platform lockcron
//! supports (`rename(2)` on POSIX, `MoveFileExW` with
//! `MOVEFILE_REPLACE_EXISTING` on Windows).

use crate::error::{CronError, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to `path`, creating parent directories as needed.
///
/// ```no_run
/// use lockcron::fs::atomic_write;
///
/// atomic_write("lockcron.yaml", b"lock_dir: files/cron\n")?;
/// # Ok::<(), lockcron::error::CronError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .map_err(|e| CronError::io("failed to create parent directory", parent, e))?;
    }

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_and_sync(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(CronError::io("failed to write temporary file", &temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(CronError::io("failed to replace", path, e));
    }

    // Persist the directory entry too; best effort.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// String convenience wrapper around [`atomic_write`].
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// `.{filename}.{pid}.tmp` next to `target`.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let filename = target.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        CronError::io(
            "invalid file path",
            target,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no UTF-8 file name"),
        )
    })?;

    let temp_name = format!(".{}.{}.tmp", filename, std::process::id());
    Ok(match target.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockcron.yaml");

        atomic_write_file(&path, "tick_period_secs: 30\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "tick_period_secs: 30\n");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lockcron.yaml");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_creates_parents_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("etc").join("lockcron").join("lockcron.yaml");

        atomic_write(&path, b"x").unwrap();

        let names: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("lockcron.yaml")]);
    }

    #[test]
    fn test_atomic_write_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = atomic_write(blocker.join("lockcron.yaml"), b"x").unwrap_err();
        assert!(matches!(err, CronError::Io { .. }));
    }
}
