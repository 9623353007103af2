//! Command-line entry point for prepare-after-updater.

use anyhow::Result;
use clap::Parser;

use prepare_after_updater::{cli, commands};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        None | Some(cli::Command::Run) => commands::run::run(&args.global, args.verbose),
        Some(cli::Command::Autoconfig(opts)) => commands::autoconfig::run(&opts),
        Some(cli::Command::Version) => {
            commands::version::run();
            Ok(())
        }
    }
}
