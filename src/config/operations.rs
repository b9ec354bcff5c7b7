//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{CronError, Result};
use crate::locks::validate_ufid;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CronError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| CronError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CronError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_dir` must be non-empty
    /// - `tick_period_secs` and `default_lead_ticks` must be positive
    /// - `jobs` keys must be valid ufids and commands must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.lock_dir.as_os_str().is_empty() {
            return Err(CronError::Config(
                "config validation failed: lock_dir must not be empty".to_string(),
            ));
        }

        if self.tick_period_secs == 0 {
            return Err(CronError::Config(
                "config validation failed: tick_period_secs must be greater than 0".to_string(),
            ));
        }

        if self.default_lead_ticks == 0 {
            return Err(CronError::Config(
                "config validation failed: default_lead_ticks must be greater than 0".to_string(),
            ));
        }

        for (ufid, command) in &self.jobs {
            if validate_ufid(ufid).is_err() {
                return Err(CronError::Config(format!(
                    "config validation failed: job name '{}' is not a valid ufid \
                     (use letters, digits, '_' or '.')",
                    ufid
                )));
            }
            if command.trim().is_empty() {
                return Err(CronError::Config(format!(
                    "config validation failed: job '{}' has an empty command",
                    ufid
                )));
            }
        }

        Ok(())
    }

    /// Same config pointed at another lock directory.
    pub fn with_lock_dir(mut self, lock_dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = lock_dir.into();
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_period_secs)
    }

    /// Tick period in milliseconds, the unit lock timestamps use.
    pub fn tick_period_ms(&self) -> i64 {
        i64::try_from(self.tick_period_secs.saturating_mul(1_000)).unwrap_or(i64::MAX)
    }

    /// Offset of the first fire for an interval created without a date.
    pub fn default_lead_ms(&self) -> i64 {
        self.tick_period_ms()
            .saturating_mul(i64::from(self.default_lead_ticks))
    }
}
