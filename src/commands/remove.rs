//! Implementation of the `lockcron remove` command.

use super::open_offline;
use crate::cli::RemoveArgs;
use lockcron::config::Config;
use lockcron::error::Result;

/// Execute the `lockcron remove` command.
///
/// Removing something that is not scheduled is not an error.
pub fn cmd_remove(config: &Config, args: RemoveArgs) -> Result<()> {
    let cron = open_offline(config)?;

    match cron.remove_schedule(&args.ufid, args.at.as_deref(), args.interval)? {
        Some(entry) => println!(
            "Removed {} schedule '{}' ({})",
            entry.kind().as_str(),
            entry.ufid,
            entry
        ),
        None => println!("No matching schedule for '{}'", args.ufid),
    }

    Ok(())
}
