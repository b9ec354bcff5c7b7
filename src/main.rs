//! Lockcron: filesystem-backed cron with lock-file mutual exclusion.
//!
//! This is the main entry point for the `lockcron` CLI. It installs the
//! tracing subscriber, parses arguments, dispatches to the appropriate command
//! handler, and maps errors to exit codes.

mod cli;
mod commands;

use cli::Cli;
use lockcron::exit_codes;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lockcron=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
