//! Evangel CLI - Command-line interface for running influence simulations.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Evangel - A deterministic hex-board influence simulation
#[derive(Parser, Debug)]
#[command(name = "evangel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug diagnostics to stderr, ignoring the environment filter
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a scenario for a number of rounds
    Run {
        /// Scenario file (default: four players in the corners of a 10x10 board)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Rounds to play (default: 10)
        #[arg(short, long, default_value = "10")]
        rounds: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the final state
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check that a scenario file builds a consistent game
    Validate {
        /// Scenario file to validate
        #[arg(required = true)]
        scenario: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            scenario,
            rounds,
            format,
            quiet,
        } => cli::run::execute(scenario.as_deref(), rounds, format, quiet),

        Commands::Validate { scenario } => cli::validate::execute(&scenario),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
