//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{
    ClassifyArgs, ConfigArgs, CoverageArgs, ImpactsArgs, PairsArgs, ReactionArgs, WindowArgs,
};

/// Tremor - Macro event impact tracker
#[derive(Parser)]
#[command(name = "tremor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (.toml or .json); defaults to the user config file if present
    #[arg(short, long, global = true, env = "TREMOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the event impact table
    Impacts(ImpactsArgs),

    /// Classify a pair of short/long proxy returns
    Classify(ClassifyArgs),

    /// Show one event's cross-asset reaction and summary
    Reaction(ReactionArgs),

    /// List (event, trading date) pairs
    Pairs(PairsArgs),

    /// Report price coverage per ticker
    Coverage(CoverageArgs),

    /// Show the price date range needed for an events file
    Window(WindowArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
