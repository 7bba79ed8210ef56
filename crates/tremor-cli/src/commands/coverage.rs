//! Coverage command implementation.
//!
//! Reports how complete each ticker's price history is.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tremor_ext_file::PriceCsvSource;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{print_header, print_output, print_single, print_warning};

/// Arguments for the coverage command.
#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Wide price CSV (date,<ticker>,...)
    #[arg(short, long)]
    pub prices: PathBuf,
}

#[derive(Debug, Serialize, Tabled)]
struct CoverageRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Observations")]
    observations: usize,
    #[tabled(rename = "Missing")]
    missing: usize,
    #[tabled(rename = "Missing %")]
    missing_pct: String,
    #[tabled(rename = "First")]
    first_date: String,
    #[tabled(rename = "Last")]
    last_date: String,
}

/// Execute the coverage command.
pub fn execute(args: CoverageArgs, ctx: &Context) -> Result<()> {
    let prices = PriceCsvSource::read_path(&args.prices)?;
    let coverage = prices.coverage();

    if ctx.format == OutputFormat::Json {
        return print_single(&coverage);
    }

    let rows: Vec<CoverageRow> = coverage
        .iter()
        .map(|c| CoverageRow {
            ticker: c.ticker.clone(),
            observations: c.observations,
            missing: c.missing,
            missing_pct: format!("{:.2}", c.missing_pct),
            first_date: c.first_date.map(|d| d.to_string()).unwrap_or_default(),
            last_date: c.last_date.map(|d| d.to_string()).unwrap_or_default(),
        })
        .collect();

    if ctx.format == OutputFormat::Table {
        print_header(&format!("Price Coverage ({} dates)", prices.len()));
    }
    print_output(&rows, ctx.format)?;

    if !ctx.quiet {
        for c in coverage.iter().filter(|c| c.observations == 0) {
            print_warning(&format!("{} has no prices", c.ticker));
        }
    }
    Ok(())
}
