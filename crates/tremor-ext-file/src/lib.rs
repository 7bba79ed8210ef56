//! # Tremor Ext File
//!
//! File adapters for the Tremor macro event impact tracker.
//!
//! - CSV event calendar source ([`EventCsvSource`])
//! - Wide CSV price table source ([`PriceCsvSource`])
//! - CSV / JSON impact table writer ([`ImpactWriter`])
//!
//! Fetching prices from a market data provider is out of scope; a provider
//! export in the wide `date,<ticker>...` layout is read as-is.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod events;
mod prices;
mod writer;

pub use events::EventCsvSource;
pub use prices::PriceCsvSource;
pub use writer::{ImpactWriter, TableFormat, CSV_COLUMNS, CSV_UNDEFINED};

use tremor_core::TremorError;

/// Maps a csv crate error onto the Tremor error taxonomy.
pub(crate) fn csv_error(source_name: &str, err: &csv::Error) -> TremorError {
    let line = err.position().map(|p| p.line() as usize);
    match err.kind() {
        csv::ErrorKind::Io(e) => TremorError::io(source_name, e),
        csv::ErrorKind::Utf8 { .. } => TremorError::parse(source_name, line, "record", "invalid UTF-8"),
        _ => TremorError::invalid_input(format!("{source_name}: {err}")),
    }
}
