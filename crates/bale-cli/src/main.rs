//! Bale CLI - Command-line utility for archive packaging with checksum
//! manifests.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Pack(args) => commands::pack::execute(args, &*formatter),
        cli::Commands::Checksum(args) => commands::checksum::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
