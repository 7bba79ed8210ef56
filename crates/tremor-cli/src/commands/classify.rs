//! Classify command implementation.
//!
//! Labels one pair of short/long proxy returns.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tremor_analytics::classify_curve_move;
use tremor_analytics::reaction::format_pct;
use tremor_core::CurveLabel;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{print_header, print_output, print_single, KeyValue};

/// Arguments for the classify command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Same-day return of the short-maturity proxy (decimal, e.g. -0.001; NaN for missing)
    #[arg(allow_negative_numbers = true)]
    pub short: f64,

    /// Same-day return of the long-maturity proxy (decimal, e.g. -0.008; NaN for missing)
    #[arg(allow_negative_numbers = true)]
    pub long: f64,
}

/// Classification result.
#[derive(Debug, Serialize, Tabled)]
struct ClassifyResult {
    #[tabled(skip)]
    short_return: Option<f64>,
    #[tabled(skip)]
    long_return: Option<f64>,
    #[tabled(rename = "Curve label")]
    curve_label: CurveLabel,
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs, ctx: &Context) -> Result<()> {
    let result = ClassifyResult {
        short_return: defined(args.short),
        long_return: defined(args.long),
        curve_label: classify_curve_move(defined(args.short), defined(args.long)),
    };

    match ctx.format {
        OutputFormat::Table => {
            print_header("Curve Classification");
            let rows = vec![
                KeyValue::new("Short return", format_pct(result.short_return)),
                KeyValue::new("Long return", format_pct(result.long_return)),
                KeyValue::new("Curve label", result.curve_label.display_name()),
            ];
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Json => print_single(&result)?,
        OutputFormat::Csv => print_output(&[result], ctx.format)?,
    }

    Ok(())
}
