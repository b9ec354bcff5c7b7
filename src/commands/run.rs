//! Implementation of the `lockcron run` command.
//!
//! `run` registers callbacks and then ticks in the foreground:
//! - `--log <ufid>` callbacks only log the fire
//! - `--job ufid=command` and config `jobs` run a command, split with
//!   `shell-words` and executed without a shell
//!
//! A job runs to completion on the tick thread. Its exit status is logged;
//! a failing job does not affect scheduling.

use lockcron::config::Config;
use lockcron::error::{CronError, Result};
use lockcron::schedule::Cron;
use std::collections::BTreeMap;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Execute the `lockcron run` command.
pub fn cmd_run(config: &Config, args: crate::cli::RunArgs) -> Result<()> {
    let cron = Cron::open(config)?;

    let mut jobs = config.jobs.clone();
    jobs.extend(args.job);

    register_callbacks(&cron, &args.log, &jobs)?;

    let registered = cron.registry().ufids();
    eprintln!("lockcron run started");
    eprintln!("  dir:       {}", cron.lock_dir().display());
    eprintln!("  period:    {}s", config.tick_period_secs);
    eprintln!("  callbacks: {}", registered.join(", "));
    if registered.is_empty() {
        tracing::warn!("no callbacks registered; due locks will be consumed without firing");
    }

    cron.join()
}

fn register_callbacks(
    cron: &Cron,
    log_ufids: &[String],
    jobs: &BTreeMap<String, String>,
) -> Result<()> {
    for ufid in log_ufids {
        let name = ufid.clone();
        cron.add_ufid_activate_function(ufid, move || {
            tracing::info!(ufid = %name, "activated");
        })?;
    }

    for (ufid, command) in jobs {
        let job = Job::parse(ufid, command)?;
        cron.add_ufid_activate_function(ufid, move || {
            job.run();
        })?;
    }

    Ok(())
}

/// A parsed job command.
#[derive(Debug, Clone)]
struct Job {
    ufid: String,
    program: String,
    args: Vec<String>,
}

impl Job {
    fn parse(ufid: &str, command: &str) -> Result<Self> {
        let mut words = shell_words::split(command).map_err(|e| {
            CronError::Config(format!(
                "failed to parse command for job '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                ufid, e
            ))
        })?;

        if words.is_empty() {
            return Err(CronError::Config(format!(
                "command for job '{}' is empty after parsing: '{}'",
                ufid, command
            )));
        }

        let program = words.remove(0);
        Ok(Self {
            ufid: ufid.to_string(),
            program,
            args: words,
        })
    }

    /// Run the command to completion and log the outcome. Returns whether it
    /// exited successfully.
    fn run(&self) -> bool {
        let start_time = Instant::now();
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {
                tracing::info!(
                    ufid = %self.ufid,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "job finished"
                );
                true
            }
            Ok(status) => {
                tracing::warn!(
                    ufid = %self.ufid,
                    program = %self.program,
                    status = %status,
                    "job failed"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    ufid = %self.ufid,
                    program = %self.program,
                    error = %e,
                    "failed to start job"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_job_parse_splits_words() {
        let job = Job::parse("backup", r#"tar czf "/tmp/my backup.tgz" data"#).unwrap();
        assert_eq!(job.program, "tar");
        assert_eq!(job.args, vec!["czf", "/tmp/my backup.tgz", "data"]);
    }

    #[test]
    fn test_job_parse_errors() {
        assert!(matches!(
            Job::parse("backup", r#"echo "unterminated"#),
            Err(CronError::Config(_))
        ));
        assert!(matches!(Job::parse("backup", "   "), Err(CronError::Config(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_job_run_reports_status() {
        assert!(Job::parse("ok", "true").unwrap().run());
        assert!(!Job::parse("fail", "false").unwrap().run());
        assert!(!Job::parse("missing", "lockcron-no-such-program").unwrap().run());
    }

    #[test]
    fn test_register_callbacks_rejects_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().with_lock_dir(temp_dir.path().join("cron"));
        let cron = Cron::builder(&config).manual_ticks().build().unwrap();

        let mut jobs = BTreeMap::new();
        jobs.insert("heartbeat".to_string(), "true".to_string());

        let err = register_callbacks(&cron, &["heartbeat".to_string()], &jobs).unwrap_err();
        assert!(matches!(err, CronError::DuplicateUfid(_)));
    }

    #[test]
    fn test_register_callbacks() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().with_lock_dir(temp_dir.path().join("cron"));
        let cron = Cron::builder(&config).manual_ticks().build().unwrap();

        let mut jobs = BTreeMap::new();
        jobs.insert("backup".to_string(), "tar czf backup.tgz data".to_string());

        register_callbacks(&cron, &["heartbeat".to_string()], &jobs).unwrap();
        assert_eq!(cron.registry().ufids(), vec!["backup", "heartbeat"]);
    }
}
