//! Window command implementation.
//!
//! Prints the date range of prices needed to cover an events file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tremor_core::Date;

use crate::cli::OutputFormat;
use crate::commands::{load_events, Context};
use crate::output::{print_header, print_output, print_single, print_warning, KeyValue};

/// Arguments for the window command.
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Events CSV
    #[arg(short, long)]
    pub events: PathBuf,

    /// Calendar days before the first event (overrides the configuration)
    #[arg(long)]
    pub lead: Option<i64>,

    /// Calendar days after the last event (overrides the configuration)
    #[arg(long)]
    pub lag: Option<i64>,
}

#[derive(Debug, Serialize)]
struct PriceWindow {
    events: usize,
    first_event: Date,
    last_event: Date,
    start: Date,
    end: Date,
}

/// Execute the window command.
pub fn execute(args: WindowArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let lead = args.lead.unwrap_or(config.price_lead_days);
    let lag = args.lag.unwrap_or(config.price_lag_days);

    let events = load_events(&args.events)?;
    let (Some((first_event, last_event)), Some((start, end))) =
        (events.date_range(), events.price_request_window(lead, lag)?)
    else {
        print_warning("No events in file; nothing to request");
        return Ok(());
    };

    let window = PriceWindow {
        events: events.len(),
        first_event,
        last_event,
        start,
        end,
    };

    match ctx.format {
        OutputFormat::Json => print_single(&window),
        OutputFormat::Table | OutputFormat::Csv => {
            if ctx.format == OutputFormat::Table {
                print_header("Price Request Window");
            }
            let rows = vec![
                KeyValue::new("events", window.events.to_string()),
                KeyValue::new("first_event", window.first_event.to_string()),
                KeyValue::new("last_event", window.last_event.to_string()),
                KeyValue::new("start", window.start.to_string()),
                KeyValue::new("end", window.end.to_string()),
            ];
            print_output(&rows, ctx.format)
        }
    }
}
