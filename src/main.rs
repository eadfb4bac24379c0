mod available;
mod cli;
mod clients;
mod commands;
mod config;
mod history;
mod index;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use index::IndexError;

/// Exit status for a query run with no index on disk
const EXIT_NO_INDEX: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG still overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);

        let code = match e.downcast_ref::<IndexError>() {
            Some(IndexError::NotFound(_)) => EXIT_NO_INDEX,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Index { enrich, available } => {
            commands::index::run(cli.config.as_deref(), cli.index.as_deref(), enrich, available)?;
        }
        Command::Query { x, y, json, info } => {
            commands::query::run(cli.config.as_deref(), cli.index.as_deref(), x, y, json, info)?;
        }
    }

    Ok(())
}
