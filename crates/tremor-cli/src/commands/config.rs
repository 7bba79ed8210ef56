//! Config command implementation.
//!
//! Shows, creates and checks tracker configuration files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use tremor_config::{ConfigFormat, TrackerConfig, Validate};

use crate::cli::OutputFormat;
use crate::commands::{default_config_path, Context};
use crate::error::CliError;
use crate::output::{print_error, print_header, print_info, print_output, print_success, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Check a configuration file
    Validate(ValidateArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Target file (.toml or .json); defaults to the user config file
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// File to check; defaults to --config or the user config file
    pub path: Option<PathBuf>,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Init(init_args) => execute_init(init_args, ctx),
        ConfigCommand::Validate(validate_args) => execute_validate(validate_args, ctx),
        ConfigCommand::Path => execute_path(ctx),
    }
}

/// Show the effective configuration.
fn execute_show(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match ctx.format {
        OutputFormat::Json => println!("{}", config.render(ConfigFormat::Json)?),
        OutputFormat::Table | OutputFormat::Csv => {
            let key_assets: Vec<String> = config
                .key_assets
                .iter()
                .map(|a| format!("{} ({})", a.ticker, a.label))
                .collect();
            let results = vec![
                KeyValue::new("z_window", config.z_window.to_string()),
                KeyValue::new("window_alignment", config.window_alignment.as_str()),
                KeyValue::new("short_proxy", config.short_proxy.clone()),
                KeyValue::new("long_proxy", config.long_proxy.clone()),
                KeyValue::new("price_lead_days", config.price_lead_days.to_string()),
                KeyValue::new("price_lag_days", config.price_lag_days.to_string()),
                KeyValue::new("parallel", config.parallel.to_string()),
                KeyValue::new("parallel_threshold", config.parallel_threshold.to_string()),
                KeyValue::new("key_assets", key_assets.join(", ")),
            ];
            if ctx.format == OutputFormat::Table {
                print_header("Current Configuration");
            }
            print_output(&results, ctx.format)?;
        }
    }

    Ok(())
}

/// Write a default configuration file.
fn execute_init(args: InitArgs, ctx: &Context) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => default_config_path().ok_or_else(|| CliError::Config("could not determine config directory".into()))?,
    };

    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    TrackerConfig::default().write_to(&path)?;
    if !ctx.quiet {
        print_success(&format!("Wrote default configuration to {}", path.display()));
    }
    Ok(())
}

/// Check a configuration file and list every problem found.
fn execute_validate(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let path = args
        .path
        .or_else(|| ctx.config_path.clone())
        .or_else(default_config_path)
        .ok_or_else(|| CliError::Config("no configuration file given".into()))?;

    let format = ConfigFormat::from_path(&path)?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Could not read {}: {}", path.display(), e))?;
    let config = TrackerConfig::parse(&content, format)?;

    let errors = config.validate();
    if errors.is_empty() {
        print_success(&format!("{} is valid", path.display()));
        return Ok(());
    }
    for error in &errors {
        print_error(&error.to_string());
    }
    anyhow::bail!("{} has {} problem(s)", path.display(), errors.len())
}

/// Show configuration file path.
fn execute_path(ctx: &Context) -> Result<()> {
    let path = ctx
        .config_path
        .clone()
        .or_else(default_config_path)
        .ok_or_else(|| CliError::Config("could not determine config directory".into()))?;
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}
