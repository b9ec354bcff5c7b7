//! Implementation of the `lockcron init` command.
//!
//! Writes a default `lockcron.yaml` (atomically, and only if missing) and
//! creates the lock directory it names. Running it again is harmless.

use lockcron::config::Config;
use lockcron::error::Result;
use lockcron::fs::atomic_write_file;
use lockcron::locks::LockStore;
use std::path::Path;

/// Execute the `lockcron init` command.
pub fn cmd_init(config_path: &Path, dir: Option<&Path>) -> Result<()> {
    let config_created = !config_path.exists();

    let config = if config_created {
        let mut config = Config::default();
        if let Some(dir) = dir {
            config = config.with_lock_dir(dir);
        }
        atomic_write_file(config_path, &config.to_yaml()?)?;
        config
    } else {
        let config = Config::load(config_path)?;
        match dir {
            Some(dir) => config.with_lock_dir(dir),
            None => config,
        }
    };

    LockStore::new(&config.lock_dir).ensure_dir()?;

    if config_created {
        println!("Created config:   {}", config_path.display());
    } else {
        println!("Config exists:    {}", config_path.display());
    }
    println!("Lock directory:   {}", config.lock_dir.display());
    println!("Tick period:      {}s", config.tick_period_secs);
    println!();
    println!("Add a schedule with `lockcron add <ufid> --every 1m`.");

    Ok(())
}
