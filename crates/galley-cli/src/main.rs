//! Galley CLI: the `galley` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            rewrites,
            placements,
            report,
            sample_limit,
            json,
        } => commands::verify::run(rewrites, placements, report, sample_limit, json),

        Commands::Fingerprint { text, file, json } => commands::fingerprint::run(text, file, json),

        Commands::Split { text, json } => commands::split::run(text, json),
    }
}
