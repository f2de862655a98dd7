use anyhow::{Result, anyhow};
use clap::Parser;
use sendrepo::commands::{self, Cli};
use sendrepo::{logging, sysexits};
use std::process;

/// Entry point for the sendrepo CLI application.
/// Parses command-line arguments and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.commands else {
        eprintln!("sendrepo requires a command to execute. See 'sendrepo --help' for usage.");
        process::exit(sysexits::EX_KEYWORD);
    };

    logging::init(cli.verbose).map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    if let Err(e) = commands::dispatch(command, cli.config.as_deref()) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("\n{e}");
        process::exit(e.exit_code());
    }
    Ok(())
}
