//! Configuration defaults for lockcron.

use std::path::PathBuf;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lockcron.yaml";

// Default value functions for serde
pub(crate) fn default_lock_dir() -> PathBuf {
    PathBuf::from("files/cron")
}
pub(crate) fn default_tick_period_secs() -> u64 {
    30
}
pub(crate) fn default_lead_ticks() -> u32 {
    3
}
