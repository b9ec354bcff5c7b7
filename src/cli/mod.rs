//! CLI argument parsing for lockcron.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgGroup, Parser, Subcommand};
use lockcron::schedule::IntervalSpec;
use std::path::PathBuf;

/// Lockcron: filesystem-backed cron with lock-file mutual exclusion.
///
/// Schedules live as files in a shared lock directory:
/// - `<timestamp>-<ufid>` is a one-shot (term) schedule
/// - `<timestamp>-<ufid>-<interval>` is a recurring (interval) schedule
/// - every process running `lockcron run` on the directory competes to fire
///   each occurrence, and exactly one wins
#[derive(Parser, Debug)]
#[command(name = "lockcron")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: lockcron.yaml in the current directory, if present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Lock directory; overrides `lock_dir` from the config.
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for lockcron.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file and create the lock directory.
    ///
    /// Leaves an existing config file untouched.
    Init,

    /// List pending schedules.
    ///
    /// Shows every lock in the directory with its kind, ufid, next fire time
    /// and interval.
    #[command(alias = "ls")]
    List,

    /// Create a schedule.
    ///
    /// With `--every` the schedule recurs, starting at `--at` (or three ticks
    /// from now). Without it, `--at` is required and the schedule fires once.
    Add(AddArgs),

    /// Remove a schedule.
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Register callbacks and run the tick loop in the foreground.
    ///
    /// Runs until the process is stopped.
    Run(RunArgs),
}

/// Arguments for the `add` command.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("when").required(true).multiple(true).args(["every", "at"])))]
pub struct AddArgs {
    /// Ufid the schedule fires (letters, digits, '_' or '.').
    pub ufid: String,

    /// Repeat every <VALUE><UNIT>, unit one of m, h, d (e.g. 1m, 2h, 1d).
    #[arg(long, value_name = "INTERVAL")]
    pub every: Option<IntervalSpec>,

    /// Execute date: RFC 3339, YYYY-MM-DD[ HH:MM[:SS]], or epoch milliseconds.
    #[arg(long, value_name = "DATE")]
    pub at: Option<String>,
}

/// Arguments for the `remove` command.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["interval", "at"])))]
pub struct RemoveArgs {
    /// Ufid whose schedule is removed.
    pub ufid: String,

    /// Remove the ufid's interval schedule.
    #[arg(long)]
    pub interval: bool,

    /// Remove the ufid's schedule at this execute date.
    #[arg(long, value_name = "DATE")]
    pub at: Option<String>,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Register a callback that only logs when UFID fires (repeatable).
    #[arg(long = "log", value_name = "UFID")]
    pub log: Vec<String>,

    /// Register a shell command for a ufid, as UFID=COMMAND (repeatable).
    ///
    /// Overrides a config job with the same ufid.
    #[arg(long = "job", value_name = "UFID=COMMAND", value_parser = parse_job)]
    pub job: Vec<(String, String)>,
}

fn parse_job(raw: &str) -> Result<(String, String), String> {
    let (ufid, command) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected UFID=COMMAND, got '{}'", raw))?;
    let (ufid, command) = (ufid.trim(), command.trim());
    if ufid.is_empty() || command.is_empty() {
        return Err(format!("expected UFID=COMMAND, got '{}'", raw));
    }
    Ok((ufid.to_string(), command.to_string()))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
