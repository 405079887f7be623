//! Okapi command-line interface
//!
//! ```text
//! okapi build <TARGET_DIR> [-I INDEX] [--format text|json]
//! okapi search <INDEX> <QUERY>... [-k N]
//! ```

mod commands;
mod config;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::build::BuildArgs;
use commands::search::SearchArgs;
use config::Config;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Best Match 25 document ranking
#[derive(Debug, Parser)]
#[command(name = "okapi", version, about)]
struct Cli {
    /// TOML file with k1, b, top_k and format settings
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug-level log output on stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an index file from a directory of documents
    Build(BuildArgs),
    /// Rank the documents of an index against a query
    Search(SearchArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Build(args) => {
            commands::build::run(&args, &config, &mut out)?;
        }
        Command::Search(args) => {
            commands::search::run(&args, &config, &mut out)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
