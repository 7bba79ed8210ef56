//! Wide-format CSV price table source.
//!
//! Layout: a `date` column followed by one column per ticker.
//!
//! ```text
//! date,SPY,TLT,SHY
//! 2024-01-02,472.65,98.10,82.05
//! 2024-01-03,468.79,,82.11
//! ```

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use tremor_core::{Date, PriceSeries, TremorError, TremorResult};

use crate::csv_error;

/// Cell values read as a missing price besides the empty cell.
const MISSING_MARKERS: [&str; 3] = ["nan", "null", "na"];

/// Reads a daily price table from a wide CSV.
///
/// Blank cells are missing prices. Rows with no price at all are dropped.
pub struct PriceCsvSource {
    name: String,
}

impl PriceCsvSource {
    /// Source named after its input (used in error messages).
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Reads a price file.
    ///
    /// # Errors
    ///
    /// See [`PriceCsvSource::read`]; also `TremorError::Io` if the file
    /// cannot be opened.
    pub fn read_path(path: impl AsRef<Path>) -> TremorResult<PriceSeries> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| TremorError::io(path.display().to_string(), e))?;
        Self::new(path.display().to_string()).read(file)
    }

    /// Reads a price table from any reader.
    ///
    /// # Errors
    ///
    /// - `TremorError::Schema` if the first column is not `date`.
    /// - `TremorError::Parse` for an unparseable date or price.
    /// - `TremorError::InvalidInput` if dates are not strictly increasing or
    ///   a price is not positive.
    pub fn read<R: Read>(&self, reader: R) -> TremorResult<PriceSeries> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers().map_err(|e| csv_error(&self.name, &e))?.clone();
        match headers.get(0) {
            Some(first) if first.eq_ignore_ascii_case("date") => {}
            _ => return Err(TremorError::schema(self.name.clone(), vec!["date".to_string()])),
        }
        let tickers: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in csv.records() {
            let record = result.map_err(|e| csv_error(&self.name, &e))?;
            let line = record.position().map(|p| p.line() as usize);

            let date_text = record.get(0).unwrap_or_default();
            let date = Date::parse_normalized(date_text)
                .map_err(|_| TremorError::parse(self.name.clone(), line, "date", date_text))?;

            let prices = tickers
                .iter()
                .enumerate()
                .map(|(i, ticker)| self.parse_price(record.get(i + 1), ticker, line))
                .collect::<TremorResult<Vec<_>>>()?;
            rows.push((date, prices));
        }

        let series = PriceSeries::from_rows(tickers, rows)?;
        let kept = series.without_empty_rows();
        if kept.len() < series.len() {
            warn!(
                source = %self.name,
                dropped = series.len() - kept.len(),
                "dropped price rows with no observations"
            );
        }
        info!(source = %self.name, dates = kept.len(), tickers = kept.tickers().len(), "loaded price table");
        Ok(kept)
    }

    fn parse_price(&self, cell: Option<&str>, ticker: &str, line: Option<usize>) -> TremorResult<Option<f64>> {
        let text = cell.unwrap_or_default();
        if text.is_empty() || MISSING_MARKERS.iter().any(|m| text.eq_ignore_ascii_case(m)) {
            return Ok(None);
        }
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| TremorError::parse(self.name.clone(), line, ticker, text))
    }
}
