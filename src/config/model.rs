//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for a scheduler instance.
///
/// This struct represents the contents of `lockcron.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Scheduler settings
    // =========================================================================
    /// Directory holding the lock files. Shared by every process that should
    /// coordinate on the same schedules.
    #[serde(default = "default_lock_dir")]
    pub lock_dir: PathBuf,

    /// Seconds between two ticks of the polling loop.
    #[serde(default = "default_tick_period_secs")]
    pub tick_period_secs: u64,

    /// Ticks of slack before the first fire of an interval created without a date.
    #[serde(default = "default_lead_ticks")]
    pub default_lead_ticks: u32,

    // =========================================================================
    // Observability
    // =========================================================================
    /// NDJSON event journal. Disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    // =========================================================================
    // CLI jobs
    // =========================================================================
    /// Shell commands registered by `lockcron run`, keyed by ufid.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub jobs: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_dir: default_lock_dir(),
            tick_period_secs: default_tick_period_secs(),
            default_lead_ticks: default_lead_ticks(),
            events_file: None,
            jobs: BTreeMap::new(),
        }
    }
}
