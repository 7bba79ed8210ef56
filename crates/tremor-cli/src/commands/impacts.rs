//! Impacts command implementation.
//!
//! Loads events and prices, applies the event horizon, computes the impact
//! table and merges curve labels.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tremor_analytics::reaction::{format_pct, format_z};
use tremor_analytics::{ImpactRow, WindowAlignment};
use tremor_config::Validate;
use tremor_ext_file::{ImpactWriter, TableFormat};

use crate::cli::OutputFormat;
use crate::commands::{parse_alignment, Context, InputArgs};
use crate::output::{print_header, print_info, print_output, print_success};

/// Arguments for the impacts command.
#[derive(Args, Debug)]
pub struct ImpactsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Z-score window in trading days (overrides the configuration)
    #[arg(long)]
    pub z_window: Option<usize>,

    /// Z-score window alignment: trailing or inclusive (overrides the configuration)
    #[arg(long, value_parser = parse_alignment)]
    pub alignment: Option<WindowAlignment>,

    /// Write the table to a file instead of stdout (.json for JSON, otherwise CSV)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One impact row for table display.
#[derive(Debug, Serialize, Tabled)]
struct ImpactDisplay {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Same-day")]
    same_day: String,
    #[tabled(rename = "Next-day")]
    next_day: String,
    #[tabled(rename = "Two-day")]
    two_day: String,
    #[tabled(rename = "Z same")]
    z_same: String,
    #[tabled(rename = "Z next")]
    z_next: String,
    #[tabled(rename = "Curve")]
    curve: String,
}

impl From<&ImpactRow> for ImpactDisplay {
    fn from(row: &ImpactRow) -> Self {
        Self {
            event: row.event_name.clone(),
            date: row.event_date_trading.to_string(),
            ticker: row.ticker.clone(),
            same_day: format_pct(row.same_day_return),
            next_day: format_pct(row.next_day_return),
            two_day: format_pct(row.two_day_return),
            z_same: format_z(row.same_day_z),
            z_next: format_z(row.next_day_z),
            curve: row.curve_label.unwrap_or_default().to_string(),
        }
    }
}

/// Execute the impacts command.
pub fn execute(args: ImpactsArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(window) = args.z_window {
        config = config.with_z_window(window);
    }
    if let Some(alignment) = args.alignment {
        config = config.with_window_alignment(alignment);
    }
    config.validate_or_error()?;

    let (_, run) = args.input.run(&config)?;

    if let Some(path) = &args.output {
        ImpactWriter::new(TableFormat::from_path(path)).write_file(&run.rows, path)?;
        if !ctx.quiet {
            print_success(&format!("Wrote {} rows to {}", run.rows.len(), path.display()));
        }
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Table => {
            print_header("Event Impacts");
            let display: Vec<ImpactDisplay> = run.rows.iter().map(ImpactDisplay::from).collect();
            print_output(&display, ctx.format)?;
            if !ctx.quiet {
                print_info(&format!(
                    "{} events through {} ({} beyond the price horizon), {} rows",
                    run.events_kept,
                    run.last_price_date,
                    run.events_beyond_horizon,
                    run.rows.len()
                ));
            }
        }
        OutputFormat::Json => ImpactWriter::new(TableFormat::Json).write_to(&run.rows, io::stdout().lock())?,
        OutputFormat::Csv => ImpactWriter::new(TableFormat::Csv).write_to(&run.rows, io::stdout().lock())?,
    }

    Ok(())
}
