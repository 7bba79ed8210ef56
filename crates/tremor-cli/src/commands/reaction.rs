//! Reaction command implementation.
//!
//! Shows every asset's reaction to one event on one trading date, the
//! event's figures, and a rule-based summary.

use std::io;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tremor_analytics::reaction::{format_pct, format_z, EventReaction, ReactionSummary};
use tremor_ext_file::{ImpactWriter, TableFormat};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, Context, InputArgs};
use crate::error::CliError;
use crate::output::{number_cell, print_header, print_output, print_single, KeyValue};

/// Arguments for the reaction command.
#[derive(Args, Debug)]
pub struct ReactionArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Event name, e.g. CPI
    #[arg(long)]
    pub event: String,

    /// Trading date the event was mapped to (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
}

/// One asset row for table display.
#[derive(Debug, Serialize, Tabled)]
struct AssetReaction {
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
}

#[derive(Serialize)]
struct ReactionReport<'a> {
    reaction: &'a EventReaction,
    summary: &'a ReactionSummary,
}

/// Execute the reaction command.
pub fn execute(args: ReactionArgs, ctx: &Context) -> Result<()> {
    let trading_date = parse_date(&args.date)?;
    let config = ctx.load_config()?;
    let (events, run) = args.input.run(&config)?;

    let reaction = EventReaction::select(&run.rows, &args.event, trading_date, &events).ok_or_else(|| {
        CliError::UnknownPair {
            event: args.event.clone(),
            date: args.date.clone(),
        }
    })?;
    let summary = reaction.summary(&config.key_assets);

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!("{} @ {}", reaction.pair.event_name, reaction.pair.event_date_trading));
            let scheduled: Vec<String> = reaction.raw_dates.iter().map(ToString::to_string).collect();
            let mut details = vec![
                KeyValue::new("Scheduled", scheduled.join(", ")),
                KeyValue::new("Curve label", reaction.curve_label.display_name()),
            ];
            if let Some(event) = &reaction.event {
                details.push(KeyValue::new("Country", event.country.clone()));
                details.push(KeyValue::new("Actual", number_cell(event.actual, 2)));
                details.push(KeyValue::new("Forecast", number_cell(event.forecast, 2)));
                details.push(KeyValue::new("Previous", number_cell(event.previous, 2)));
                details.push(KeyValue::new("Surprise", number_cell(event.surprise(), 2)));
            }
            print_output(&details, ctx.format)?;

            print_header("Cross-asset reaction");
            let assets: Vec<AssetReaction> = reaction
                .rows
                .iter()
                .map(|r| AssetReaction {
                    ticker: r.ticker.clone(),
                    same_day: format_pct(r.same_day_return),
                    next_day: format_pct(r.next_day_return),
                    two_day: format_pct(r.two_day_return),
                    z_same: format_z(r.same_day_z),
                    z_next: format_z(r.next_day_z),
                })
                .collect();
            print_output(&assets, ctx.format)?;

            print_header("Summary");
            println!("{summary}");
        }
        OutputFormat::Json => print_single(&ReactionReport {
            reaction: &reaction,
            summary: &summary,
        })?,
        OutputFormat::Csv => ImpactWriter::new(TableFormat::Csv).write_to(&reaction.rows, io::stdout().lock())?,
    }

    Ok(())
}
