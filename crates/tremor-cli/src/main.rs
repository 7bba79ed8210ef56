//! Tremor CLI - Command-line interface for the macro event impact tracker.
//!
//! # Usage
//!
//! ```bash
//! # Impact table for an events calendar and a wide price file
//! tremor impacts --events events.csv --prices prices.csv
//!
//! # Export it
//! tremor impacts --events events.csv --prices prices.csv --output impacts.csv
//!
//! # One event's reaction
//! tremor reaction --events events.csv --prices prices.csv --event CPI --date 2024-01-11
//!
//! # Classify a curve move
//! tremor classify -- -0.001 -0.008
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        format: cli.format,
        quiet: cli.quiet,
        config_path: cli.config,
    };

    // Execute command
    match cli.command {
        Commands::Impacts(args) => commands::impacts::execute(args, &ctx)?,
        Commands::Classify(args) => commands::classify::execute(args, &ctx)?,
        Commands::Reaction(args) => commands::reaction::execute(args, &ctx)?,
        Commands::Pairs(args) => commands::pairs::execute(args, &ctx)?,
        Commands::Coverage(args) => commands::coverage::execute(args, &ctx)?,
        Commands::Window(args) => commands::window::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}

/// Installs the stderr log subscriber. `RUST_LOG` applies unless `-v` is given.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
