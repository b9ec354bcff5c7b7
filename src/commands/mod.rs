//! Command implementations for lockcron.
//!
//! This module resolves the effective configuration (config file plus the
//! global `--dir` override) and routes each subcommand to its handler.

mod add;
mod init;
mod list;
mod remove;
mod run;

use crate::cli::{Cli, Command};
use lockcron::config::{Config, DEFAULT_CONFIG_FILE};
use lockcron::error::Result;
use lockcron::schedule::Cron;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        config,
        dir,
        command,
    } = cli;

    match command {
        Command::Init => init::cmd_init(&config_path(config.as_deref()), dir.as_deref()),
        Command::List => list::cmd_list(&resolve_config(config.as_deref(), dir)?),
        Command::Add(args) => add::cmd_add(&resolve_config(config.as_deref(), dir)?, args),
        Command::Remove(args) => remove::cmd_remove(&resolve_config(config.as_deref(), dir)?, args),
        Command::Run(args) => run::cmd_run(&resolve_config(config.as_deref(), dir)?, args),
    }
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the config named by `--config`, else `lockcron.yaml` if it exists,
/// else the defaults; then apply `--dir`.
///
/// An explicit `--config` that cannot be read is an error.
fn resolve_config(explicit: Option<&Path>, dir: Option<PathBuf>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::load(default_path)?
            } else {
                Config::default()
            }
        }
    };

    Ok(match dir {
        Some(dir) => config.with_lock_dir(dir),
        None => config,
    })
}

/// A `Cron` for commands that only edit the lock directory: no loop thread.
fn open_offline(config: &Config) -> Result<Cron> {
    Cron::builder(config).manual_ticks().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockcron::error::CronError;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_config_applies_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cron.yaml");
        std::fs::write(&path, "lock_dir: shared/cron\ntick_period_secs: 10\n").unwrap();

        let config = resolve_config(Some(&path), None).unwrap();
        assert_eq!(config.lock_dir, PathBuf::from("shared/cron"));
        assert_eq!(config.tick_period_secs, 10);

        let config = resolve_config(Some(&path), Some(PathBuf::from("elsewhere"))).unwrap();
        assert_eq!(config.lock_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.tick_period_secs, 10);
    }

    #[test]
    fn test_resolve_config_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_config(Some(&temp_dir.path().join("missing.yaml")), None).unwrap_err();
        assert!(matches!(err, CronError::Config(_)));
    }

    #[test]
    fn test_config_path_defaults() {
        assert_eq!(config_path(None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(
            config_path(Some(Path::new("etc/cron.yaml"))),
            PathBuf::from("etc/cron.yaml")
        );
    }
}
