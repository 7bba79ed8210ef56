//! Per-event, per-asset reaction table.
//!
//! For each event the raw date is mapped onto the observed trading
//! calendar. Events landing on the first or last trading day have no
//! neighbour on one side and are dropped. Every other event yields one row
//! per ticker, whether or not that ticker has data around the event.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tremor_core::{CurveLabel, Date, Event, EventStore, PriceSeries, TradingCalendar, TremorResult};

use crate::parallel::maybe_parallel_map;
use crate::returns::{self, validate_window, ReturnTable, WindowAlignment, ZScoreTable, DEFAULT_Z_WINDOW};

/// Default event count above which per-event work is parallelized.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Settings for the impact computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Rolling window for z-scores, in trading days.
    pub z_window: usize,
    /// Whether the z-score window ends at `t-1` or at `t`.
    pub alignment: WindowAlignment,
    /// Allow parallel per-event computation (needs the `parallel` feature).
    pub parallel: bool,
    /// Minimum number of events before going parallel.
    pub parallel_threshold: usize,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            z_window: DEFAULT_Z_WINDOW,
            alignment: WindowAlignment::default(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ImpactConfig {
    /// Sets the z-score window.
    #[must_use]
    pub fn with_z_window(mut self, window: usize) -> Self {
        self.z_window = window;
        self
    }

    /// Sets the z-score window alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: WindowAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Enables or disables parallel computation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if `len` items should be processed in parallel.
    #[must_use]
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.parallel && len > self.parallel_threshold
    }
}

/// One asset's reaction to one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRow {
    /// Event name.
    pub event_name: String,
    /// Event country.
    pub country: String,
    /// Event date as scheduled (may be a non-trading day).
    pub event_date_raw: Date,
    /// Trading day the event was mapped to.
    pub event_date_trading: Date,
    /// Trading day before `event_date_trading`.
    pub t_minus_1: Date,
    /// Trading day after `event_date_trading`.
    pub t_plus_1: Date,
    /// Asset ticker.
    pub ticker: String,
    /// Return from `t_minus_1` to `event_date_trading`.
    pub same_day_return: Option<f64>,
    /// Return from `event_date_trading` to `t_plus_1`.
    pub next_day_return: Option<f64>,
    /// Compounded return over both days.
    pub two_day_return: Option<f64>,
    /// Same-day return normalized by rolling volatility.
    pub same_day_z: Option<f64>,
    /// Next-day return normalized by rolling volatility.
    pub next_day_z: Option<f64>,
    /// Curve-shape label, filled in by [`crate::curve::merge_curve_labels`].
    pub curve_label: Option<CurveLabel>,
}

impl ImpactRow {
    /// Sort key of the impact table.
    fn sort_key(&self) -> (Date, &str, &str) {
        (self.event_date_trading, &self.event_name, &self.ticker)
    }

    /// The `(event_name, event_date_trading)` group this row belongs to.
    #[must_use]
    pub fn group_key(&self) -> (&str, Date) {
        (&self.event_name, self.event_date_trading)
    }
}

/// Compounds two daily returns: `(1 + same)(1 + next) - 1`.
#[must_use]
pub fn two_day_return(same_day: Option<f64>, next_day: Option<f64>) -> Option<f64> {
    Some((1.0 + same_day?) * (1.0 + next_day?) - 1.0)
}

/// Sorts rows by `(event_date_trading, event_name, ticker)`, stably.
pub fn sort_impact_rows(rows: &mut [ImpactRow]) {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Computes event impacts against one price table.
///
/// Returns and z-scores are derived once at construction; every event is
/// then a set of indexed lookups.
#[derive(Debug, Clone)]
pub struct ImpactComputer {
    calendar: TradingCalendar,
    returns: ReturnTable,
    zscores: ZScoreTable,
    config: ImpactConfig,
}

impl ImpactComputer {
    /// Prepares returns, z-scores and the trading calendar.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if the price table is empty or
    /// the z-score window is below the minimum.
    pub fn new(prices: &PriceSeries, config: ImpactConfig) -> TremorResult<Self> {
        validate_window(config.z_window)?;
        let calendar = prices.trading_calendar()?;
        let returns = returns::returns(prices);
        let zscores = returns::zscores(&returns, config.z_window, config.alignment)?;
        Ok(Self {
            calendar,
            returns,
            zscores,
            config,
        })
    }

    /// The observed trading calendar.
    #[must_use]
    pub fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ImpactConfig {
        &self.config
    }

    /// Rows for a single event, one per ticker, in ticker column order.
    ///
    /// Empty when the event maps onto the first or last trading day.
    #[must_use]
    pub fn event_rows(&self, event: &Event) -> Vec<ImpactRow> {
        let trading_date = self.calendar.map_date(event.date);
        let Some(pos) = self.calendar.position(trading_date) else {
            debug!(event = %event.name, date = %event.date, "mapped date not in calendar, skipping");
            return Vec::new();
        };
        let Some((t_minus_1, t_plus_1)) = self.calendar.neighbors(pos) else {
            warn!(
                event = %event.name,
                date = %event.date,
                trading_date = %trading_date,
                "event on calendar boundary, skipping"
            );
            return Vec::new();
        };

        self.returns
            .tickers()
            .iter()
            .enumerate()
            .map(|(col, ticker)| {
                let same_day_return = self.returns.at(pos, col);
                let next_day_return = self.returns.at(pos + 1, col);
                ImpactRow {
                    event_name: event.name.clone(),
                    country: event.country.clone(),
                    event_date_raw: event.date,
                    event_date_trading: trading_date,
                    t_minus_1,
                    t_plus_1,
                    ticker: ticker.clone(),
                    same_day_return,
                    next_day_return,
                    two_day_return: two_day_return(same_day_return, next_day_return),
                    same_day_z: self.zscores.at(pos, col),
                    next_day_z: self.zscores.at(pos + 1, col),
                    curve_label: None,
                }
            })
            .collect()
    }

    /// Rows for every event, sorted by `(event_date_trading, event_name, ticker)`.
    #[must_use]
    pub fn compute(&self, events: &EventStore) -> Vec<ImpactRow> {
        let per_event = maybe_parallel_map(events.events(), &self.config, |e| self.event_rows(e));
        let emitted = per_event.iter().filter(|rows| !rows.is_empty()).count();

        let mut rows: Vec<ImpactRow> = per_event.into_iter().flatten().collect();
        sort_impact_rows(&mut rows);

        info!(
            events = events.len(),
            events_emitted = emitted,
            events_dropped = events.len() - emitted,
            rows = rows.len(),
            "computed event impacts"
        );
        rows
    }
}

/// One-shot helper: prepares an [`ImpactComputer`] and runs it.
///
/// # Errors
///
/// See [`ImpactComputer::new`].
pub fn compute_event_impacts(
    events: &EventStore,
    prices: &PriceSeries,
    config: &ImpactConfig,
) -> TremorResult<Vec<ImpactRow>> {
    Ok(ImpactComputer::new(prices, config.clone())?.compute(events))
}
