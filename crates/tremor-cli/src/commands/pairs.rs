//! Pairs command implementation.
//!
//! Lists the unique (event, trading date) pairs of the impact table, the
//! unit a per-event report is produced for.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tremor_analytics::event_pairs;

use crate::cli::OutputFormat;
use crate::commands::{Context, InputArgs};
use crate::output::{print_header, print_output};

/// Arguments for the pairs command.
#[derive(Args, Debug)]
pub struct PairsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize, Tabled)]
struct PairRow {
    #[tabled(rename = "Event")]
    event_name: String,
    #[tabled(rename = "Trading date")]
    event_date_trading: String,
    #[tabled(rename = "Curve label")]
    curve_label: String,
}

/// Execute the pairs command.
pub fn execute(args: PairsArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let (_, run) = args.input.run(&config)?;

    let rows: Vec<PairRow> = event_pairs(&run.rows)
        .into_iter()
        .map(|pair| {
            let label = run
                .rows
                .iter()
                .find(|r| r.event_name == pair.event_name && r.event_date_trading == pair.event_date_trading)
                .and_then(|r| r.curve_label)
                .unwrap_or_default();
            PairRow {
                event_name: pair.event_name,
                event_date_trading: pair.event_date_trading.to_string(),
                curve_label: label.to_string(),
            }
        })
        .collect();

    if ctx.format == OutputFormat::Table {
        print_header("Event Pairs");
    }
    print_output(&rows, ctx.format)
}
