//! Implementation of the `lockcron list` command.

use chrono::{DateTime, Local};
use lockcron::config::Config;
use lockcron::error::Result;
use lockcron::locks::{LockEntry, LockStore};

/// Execute the `lockcron list` command.
pub fn cmd_list(config: &Config) -> Result<()> {
    let store = LockStore::new(&config.lock_dir);
    if !store.dir().exists() {
        println!("No schedules ({} does not exist).", store.dir().display());
        return Ok(());
    }

    let entries = store.list_all()?;
    if entries.is_empty() {
        println!("No schedules.");
        return Ok(());
    }

    println!("{:<10} {:<24} {:<27} INTERVAL", "KIND", "UFID", "NEXT FIRE");
    for entry in &entries {
        println!("{}", format_row(entry));
    }
    println!();
    println!("{} schedule(s) in {}", entries.len(), store.dir().display());

    Ok(())
}

fn format_row(entry: &LockEntry) -> String {
    format!(
        "{:<10} {:<24} {:<27} {}",
        entry.kind().as_str(),
        entry.ufid,
        format_timestamp(entry.execute_timestamp),
        entry
            .interval_timestamp
            .map(format_interval)
            .unwrap_or_else(|| "-".to_string())
    )
}

/// Local time with offset, or the raw milliseconds when out of chrono's range.
fn format_timestamp(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        None => format!("{}ms", ms),
    }
}

/// Largest unit that divides the interval evenly.
fn format_interval(ms: i64) -> String {
    const UNITS: [(i64, &str); 3] = [(86_400_000, "d"), (3_600_000, "h"), (60_000, "m")];

    UNITS
        .iter()
        .find(|(unit_ms, _)| ms % unit_ms == 0)
        .map(|(unit_ms, code)| format!("{}{}", ms / unit_ms, code))
        .unwrap_or_else(|| format!("{}ms", ms))
}
