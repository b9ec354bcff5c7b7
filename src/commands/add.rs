//! Implementation of the `lockcron add` command.

use super::open_offline;
use crate::cli::AddArgs;
use lockcron::config::Config;
use lockcron::error::Result;
use lockcron::schedule::ScheduleRequest;

/// Execute the `lockcron add` command.
pub fn cmd_add(config: &Config, args: AddArgs) -> Result<()> {
    let cron = open_offline(config)?;

    let request = match args.every {
        Some(every) => {
            let request = ScheduleRequest::interval(args.ufid, every);
            match args.at {
                Some(at) => request.starting_at(at),
                None => request,
            }
        }
        None => ScheduleRequest {
            ufid: args.ufid,
            execute_date: args.at,
            interval: None,
        },
    };

    let entry = cron.create_schedule(request)?;

    println!(
        "Added {} schedule '{}' in {}",
        entry.kind().as_str(),
        entry.ufid,
        cron.lock_dir().display()
    );
    println!("  lock: {}", entry);

    Ok(())
}
