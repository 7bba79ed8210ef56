//! End-to-end impact run.
//!
//! Applies the event horizon, computes the impact table and merges curve
//! labels in one call. Fails before producing any rows if the inputs are
//! unusable.

use serde::{Deserialize, Serialize};
use tracing::info;

use tremor_core::{Date, EventStore, PriceSeries, TremorResult};

use crate::curve::{merge_curve_labels, CurveProxies};
use crate::impact::{ImpactComputer, ImpactConfig, ImpactRow};

/// Result of one impact run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRun {
    /// Labelled impact table in output order.
    pub rows: Vec<ImpactRow>,
    /// Events dated on or before the last price date.
    pub events_kept: usize,
    /// Events discarded by the horizon filter.
    pub events_beyond_horizon: usize,
    /// Last trading date of the price table.
    pub last_price_date: Date,
}

/// Impact computation plus curve-label merge.
#[derive(Debug, Clone, Default)]
pub struct ImpactPipeline {
    config: ImpactConfig,
    proxies: CurveProxies,
}

impl ImpactPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(config: ImpactConfig, proxies: CurveProxies) -> Self {
        Self { config, proxies }
    }

    /// Impact settings.
    #[must_use]
    pub fn config(&self) -> &ImpactConfig {
        &self.config
    }

    /// Curve proxies.
    #[must_use]
    pub fn proxies(&self) -> &CurveProxies {
        &self.proxies
    }

    /// Runs the full batch.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if the price table is empty or the
    /// z-score window is too small.
    pub fn run(&self, events: &EventStore, prices: &PriceSeries) -> TremorResult<ImpactRun> {
        let computer = ImpactComputer::new(prices, self.config.clone())?;
        let last_price_date = computer.calendar().last();

        let in_horizon = events.through(last_price_date);
        let rows = merge_curve_labels(computer.compute(&in_horizon), &self.proxies);

        info!(
            rows = rows.len(),
            events = in_horizon.len(),
            last_price_date = %last_price_date,
            "impact run complete"
        );
        Ok(ImpactRun {
            rows,
            events_kept: in_horizon.len(),
            events_beyond_horizon: events.len() - in_horizon.len(),
            last_price_date,
        })
    }
}
