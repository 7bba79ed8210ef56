//! Scheduled macro events and the validated event store.
//!
//! Raw records come from an [`EventSource`] (a CSV file, a fixture, …) as
//! untyped strings. [`EventStore::load`] applies the schema checks, parses
//! dates strictly and numeric fields leniently, and returns the events in
//! deterministic `(name, date)` order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{TremorError, TremorResult};
use crate::types::Date;

/// Columns every event source must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["event_name", "date", "country"];

/// Optional numeric columns.
pub const NUMERIC_COLUMNS: [&str; 3] = ["actual", "forecast", "previous"];

/// Default calendar-day padding before the first event when requesting prices.
pub const DEFAULT_PRICE_LEAD_DAYS: i64 = 10;

/// Default calendar-day padding after the last event when requesting prices.
pub const DEFAULT_PRICE_LAG_DAYS: i64 = 30;

/// Upper bound on either side of the price request window.
pub const MAX_PRICE_WINDOW_DAYS: i64 = 3650;

/// An unvalidated event record as read from a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// 1-based line of the record in its source (header is line 1 for CSV).
    #[serde(skip)]
    pub line: usize,
    /// Event name, e.g. "CPI".
    pub event_name: Option<String>,
    /// Event date, ISO-8601 date or date-time.
    pub date: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Actual print.
    pub actual: Option<String>,
    /// Consensus forecast.
    pub forecast: Option<String>,
    /// Previous print.
    pub previous: Option<String>,
}

/// A batch of raw records plus the column names the source exposed.
#[derive(Debug, Clone, Default)]
pub struct RawEventBatch {
    /// Column names present in the source.
    pub columns: Vec<String>,
    /// Records in source order.
    pub records: Vec<RawEvent>,
}

/// Something that can produce raw event records.
pub trait EventSource {
    /// Name used in error messages (usually the file path).
    fn source_name(&self) -> String;

    /// Reads every record from the source.
    fn read(&mut self) -> TremorResult<RawEventBatch>;
}

/// In-memory event source, mostly for tests and fixtures.
#[derive(Debug, Clone)]
pub struct MemoryEventSource {
    name: String,
    batch: RawEventBatch,
}

impl MemoryEventSource {
    /// Creates a source exposing all standard columns.
    pub fn new(name: impl Into<String>, records: Vec<RawEvent>) -> Self {
        let columns = REQUIRED_COLUMNS
            .iter()
            .chain(NUMERIC_COLUMNS.iter())
            .map(|c| (*c).to_string())
            .collect();
        Self::with_columns(name, columns, records)
    }

    /// Creates a source with an explicit column list.
    pub fn with_columns(name: impl Into<String>, columns: Vec<String>, records: Vec<RawEvent>) -> Self {
        Self {
            name: name.into(),
            batch: RawEventBatch { columns, records },
        }
    }
}

impl EventSource for MemoryEventSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn read(&mut self) -> TremorResult<RawEventBatch> {
        Ok(self.batch.clone())
    }
}

/// A validated scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Event date (no time component, may be a non-trading day).
    pub date: Date,
    /// Country code.
    pub country: String,
    /// Actual print, if known and numeric.
    pub actual: Option<f64>,
    /// Consensus forecast, if known and numeric.
    pub forecast: Option<f64>,
    /// Previous print, if known and numeric.
    pub previous: Option<f64>,
}

impl Event {
    /// Creates an event with no actual/forecast/previous values.
    pub fn new(name: impl Into<String>, date: Date, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date,
            country: country.into(),
            actual: None,
            forecast: None,
            previous: None,
        }
    }

    /// Sets the actual/forecast/previous values.
    #[must_use]
    pub fn with_values(mut self, actual: Option<f64>, forecast: Option<f64>, previous: Option<f64>) -> Self {
        self.actual = actual;
        self.forecast = forecast;
        self.previous = previous;
        self
    }

    /// Returns `actual - forecast` when both are known.
    #[must_use]
    pub fn surprise(&self) -> Option<f64> {
        Some(self.actual? - self.forecast?)
    }

    fn from_raw(source_name: &str, raw: RawEvent) -> TremorResult<Self> {
        let name = required(source_name, "event_name", raw.event_name, raw.line)?;
        let date_text = required(source_name, "date", raw.date, raw.line)?;
        let country = required(source_name, "country", raw.country, raw.line)?;

        let date = Date::parse_normalized(&date_text)
            .map_err(|_| TremorError::parse(source_name, Some(raw.line), "date", date_text.as_str()))?;

        Ok(Self {
            name,
            date,
            country,
            actual: lenient_number(raw.actual.as_deref()),
            forecast: lenient_number(raw.forecast.as_deref()),
            previous: lenient_number(raw.previous.as_deref()),
        })
    }
}

fn required(source_name: &str, field: &str, value: Option<String>, line: usize) -> TremorResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(TremorError::missing_value(source_name, field, line)),
    }
}

/// Numeric cells that do not parse (or parse to NaN/inf) are treated as missing.
fn lenient_number(value: Option<&str>) -> Option<f64> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            debug!(value = text, "non-numeric event value treated as missing");
            None
        }
    }
}

/// Validated events, sorted by `(name, date)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    /// Loads and validates every record of a source.
    ///
    /// # Errors
    ///
    /// - `TremorError::Schema` if a required column is absent, or a record
    ///   leaves a required field empty.
    /// - `TremorError::Parse` if a date cannot be parsed.
    pub fn load<S: EventSource + ?Sized>(source: &mut S) -> TremorResult<Self> {
        let source_name = source.source_name();
        let batch = source.read()?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !batch.columns.iter().any(|c| c.trim() == **col))
            .map(|col| (*col).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TremorError::schema(source_name, missing));
        }

        let events = batch
            .records
            .into_iter()
            .map(|raw| Event::from_raw(&source_name, raw))
            .collect::<TremorResult<Vec<_>>>()?;

        info!(source = %source_name, events = events.len(), "loaded event calendar");
        Ok(Self::from_events(events))
    }

    /// Builds a store from already-validated events.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        // stable: duplicates of (name, date) keep source order
        events.sort_by(|a, b| a.name.cmp(&b.name).then(a.date.cmp(&b.date)));
        Self { events }
    }

    /// Returns the events in `(name, date)` order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterates the events in `(name, date)` order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if there are no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Keeps only events dated on or before `last_date`.
    #[must_use]
    pub fn through(&self, last_date: Date) -> Self {
        let events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.date <= last_date)
            .cloned()
            .collect();
        info!(
            last_date = %last_date,
            kept = events.len(),
            dropped = self.events.len() - events.len(),
            "filtered events to price horizon"
        );
        Self { events }
    }

    /// Earliest and latest event dates.
    #[must_use]
    pub fn date_range(&self) -> Option<(Date, Date)> {
        let first = self.events.iter().map(|e| e.date).min()?;
        let last = self.events.iter().map(|e| e.date).max()?;
        Some((first, last))
    }

    /// Date range to request from the price provider: `lead_days` before the
    /// first event through `lag_days` after the last one. `Ok(None)` for an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if either padding is negative or
    /// above [`MAX_PRICE_WINDOW_DAYS`].
    pub fn price_request_window(&self, lead_days: i64, lag_days: i64) -> TremorResult<Option<(Date, Date)>> {
        for (name, days) in [("lead", lead_days), ("lag", lag_days)] {
            if !(0..=MAX_PRICE_WINDOW_DAYS).contains(&days) {
                return Err(TremorError::invalid_input(format!(
                    "price window {name} of {days} days is outside 0..={MAX_PRICE_WINDOW_DAYS}"
                )));
            }
        }
        let Some((first, last)) = self.date_range() else {
            return Ok(None);
        };
        let start = first
            .checked_add_days(-lead_days)
            .ok_or_else(|| TremorError::invalid_input(format!("{first} minus {lead_days} days is out of range")))?;
        let end = last
            .checked_add_days(lag_days)
            .ok_or_else(|| TremorError::invalid_input(format!("{last} plus {lag_days} days is out of range")))?;
        Ok(Some((start, end)))
    }

    /// Finds the first event with this name on this (raw) date.
    #[must_use]
    pub fn find(&self, name: &str, date: Date) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name && e.date == date)
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
