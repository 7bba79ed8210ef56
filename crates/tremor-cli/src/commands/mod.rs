//! CLI command implementations.

pub mod classify;
pub mod config;
pub mod coverage;
pub mod impacts;
pub mod pairs;
pub mod reaction;
pub mod window;

// Re-export submodules for convenience
pub use classify::ClassifyArgs;
pub use config::ConfigArgs;
pub use coverage::CoverageArgs;
pub use impacts::ImpactsArgs;
pub use pairs::PairsArgs;
pub use reaction::ReactionArgs;
pub use window::WindowArgs;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::debug;

use tremor_analytics::{ImpactPipeline, ImpactRun, WindowAlignment};
use tremor_config::TrackerConfig;
use tremor_core::{Date, EventStore, PriceSeries};
use tremor_ext_file::{EventCsvSource, PriceCsvSource};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format.
    pub format: OutputFormat,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Loads the effective configuration.
    ///
    /// An explicit `--config` must exist. Otherwise the user config file is
    /// used when present, and the built-in defaults when not.
    pub fn load_config(&self) -> Result<TrackerConfig> {
        if let Some(path) = &self.config_path {
            return Ok(TrackerConfig::from_file(path)?);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "using user configuration");
                Ok(TrackerConfig::from_file(&path)?)
            }
            _ => Ok(TrackerConfig::default()),
        }
    }
}

/// Event and price input files.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Events CSV (event_name,date,country[,actual,forecast,previous])
    #[arg(short, long)]
    pub events: PathBuf,

    /// Wide price CSV (date,<ticker>,...)
    #[arg(short, long)]
    pub prices: PathBuf,
}

impl InputArgs {
    /// Loads both inputs.
    pub fn load(&self) -> Result<(EventStore, PriceSeries)> {
        let events = load_events(&self.events)?;
        let prices = PriceCsvSource::read_path(&self.prices)?;
        Ok((events, prices))
    }

    /// Loads both inputs and runs the full impact pipeline.
    pub fn run(&self, config: &TrackerConfig) -> Result<(EventStore, ImpactRun)> {
        let (events, prices) = self.load()?;
        let run = ImpactPipeline::new(config.impact_config(), config.curve_proxies()).run(&events, &prices)?;
        Ok((events, run))
    }
}

/// Loads an events CSV.
pub fn load_events(path: &Path) -> Result<EventStore> {
    Ok(EventStore::load(&mut EventCsvSource::from_path(path))?)
}

/// User configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("tremor").join("config.toml"))
}

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Parses a window alignment name.
pub fn parse_alignment(s: &str) -> Result<WindowAlignment, String> {
    s.parse().map_err(|e: tremor_core::TremorError| e.to_string())
}
