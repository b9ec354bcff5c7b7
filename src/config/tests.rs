//! Tests for config functionality.

use crate::config::Config;
use crate::error::CronError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.lock_dir, PathBuf::from("files/cron"));
    assert_eq!(config.tick_period_secs, 30);
    assert_eq!(config.default_lead_ticks, 3);
    assert!(config.events_file.is_none());
    assert!(config.jobs.is_empty());
    assert_eq!(config.tick_period(), Duration::from_secs(30));
    assert_eq!(config.tick_period_ms(), 30_000);
    assert_eq!(config.default_lead_ms(), 90_000);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.tick_period_secs, 30);
    assert_eq!(config.lock_dir, PathBuf::from("files/cron"));
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
lock_dir: /var/lib/lockcron
tick_period_secs: 10
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_dir, PathBuf::from("/var/lib/lockcron"));
    assert_eq!(config.tick_period_ms(), 10_000);
    assert_eq!(config.default_lead_ticks, 3);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
lock_dir: shared/cron
tick_period_secs: 5
default_lead_ticks: 4
events_file: shared/events.ndjson
jobs:
  saveCurrencyUsdData: "curl -s http://api.nbp.pl/api/exchangerates/rates/a/usd/"
  logCurrentDate: date
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.default_lead_ms(), 20_000);
    assert_eq!(
        config.events_file,
        Some(PathBuf::from("shared/events.ndjson"))
    );
    assert_eq!(config.jobs.len(), 2);
    assert_eq!(config.jobs["logCurrentDate"], "date");
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
tick_period_secs: 15
future_option: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.tick_period_secs, 15);
}

#[test]
fn test_validation_rejects_zero_period() {
    let err = Config::from_yaml("tick_period_secs: 0").unwrap_err();
    assert!(matches!(err, CronError::Config(_)));
    assert!(err.to_string().contains("tick_period_secs"));
}

#[test]
fn test_validation_rejects_zero_lead() {
    let err = Config::from_yaml("default_lead_ticks: 0").unwrap_err();
    assert!(err.to_string().contains("default_lead_ticks"));
}

#[test]
fn test_validation_rejects_bad_job_name() {
    let yaml = r#"
jobs:
  save-usd: "echo hi"
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("save-usd"));
}

#[test]
fn test_validation_rejects_empty_job_command() {
    let yaml = r#"
jobs:
  saveUsd: "  "
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("empty command"));
}

#[test]
fn test_yaml_roundtrip_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lockcron.yaml");

    let mut config = Config::default().with_lock_dir(temp_dir.path().join("cron"));
    config.jobs.insert("logCurrentDate".to_string(), "date".to_string());
    std::fs::write(&path, config.to_yaml().unwrap()).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.lock_dir, temp_dir.path().join("cron"));
    assert_eq!(loaded.jobs["logCurrentDate"], "date");
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
