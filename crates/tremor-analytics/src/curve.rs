//! Yield-curve reaction classification.
//!
//! Two bond ETFs stand in for the short and long ends of the curve. Their
//! same-day price returns are mapped onto a [`CurveLabel`], which is then
//! joined back onto every row of the event's group in the impact table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tremor_core::{CurveLabel, Date};

use crate::impact::ImpactRow;

/// Default short-maturity proxy (1-3y Treasury ETF).
pub const DEFAULT_SHORT_PROXY: &str = "SHY";

/// Default long-maturity proxy (20y+ Treasury ETF).
pub const DEFAULT_LONG_PROXY: &str = "TLT";

/// Classifies a pair of proxy returns.
///
/// - Either return undefined (or NaN): `Unknown`.
/// - Both negative (bear): `BearSteepening` if the long end fell more,
///   otherwise `BearFlattening`.
/// - Both positive (bull): `BullSteepening` if the long end rose more,
///   otherwise `BullFlattening`.
/// - Anything else, including a zero on either side: `Twist`.
///
/// Equal returns land in the flattening branch.
///
/// # Example
///
/// ```rust
/// use tremor_analytics::curve::classify_curve_move;
/// use tremor_core::CurveLabel;
///
/// assert_eq!(classify_curve_move(Some(-0.01), Some(-0.02)), CurveLabel::BearSteepening);
/// assert_eq!(classify_curve_move(Some(-0.01), Some(-0.01)), CurveLabel::BearFlattening);
/// ```
#[must_use]
pub fn classify_curve_move(short_return: Option<f64>, long_return: Option<f64>) -> CurveLabel {
    let (Some(short), Some(long)) = (short_return, long_return) else {
        return CurveLabel::Unknown;
    };
    if short.is_nan() || long.is_nan() {
        return CurveLabel::Unknown;
    }

    if short < 0.0 && long < 0.0 {
        if long < short {
            CurveLabel::BearSteepening
        } else {
            CurveLabel::BearFlattening
        }
    } else if short > 0.0 && long > 0.0 {
        if long > short {
            CurveLabel::BullSteepening
        } else {
            CurveLabel::BullFlattening
        }
    } else {
        CurveLabel::Twist
    }
}

/// The short/long proxy tickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveProxies {
    /// Short-maturity proxy ticker.
    pub short: String,
    /// Long-maturity proxy ticker.
    pub long: String,
}

impl Default for CurveProxies {
    fn default() -> Self {
        Self::new(DEFAULT_SHORT_PROXY, DEFAULT_LONG_PROXY)
    }
}

impl CurveProxies {
    /// Creates a proxy pair.
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
        }
    }
}

/// Computes one label per `(event_name, event_date_trading)` group.
///
/// Within a group the first row of each proxy ticker is used; a group
/// missing either proxy gets `Unknown`.
#[must_use]
pub fn curve_labels(rows: &[ImpactRow], proxies: &CurveProxies) -> HashMap<(String, Date), CurveLabel> {
    // (short, long) same-day returns per group; outer Option = proxy row seen
    let mut found: HashMap<(&str, Date), (Option<Option<f64>>, Option<Option<f64>>)> = HashMap::new();

    for row in rows {
        let entry = found.entry(row.group_key()).or_default();
        if row.ticker == proxies.short && entry.0.is_none() {
            entry.0 = Some(row.same_day_return);
        }
        if row.ticker == proxies.long && entry.1.is_none() {
            entry.1 = Some(row.same_day_return);
        }
    }

    found
        .into_iter()
        .map(|((name, date), proxy_returns)| {
            let label = match proxy_returns {
                (Some(short), Some(long)) => classify_curve_move(short, long),
                _ => CurveLabel::Unknown,
            };
            ((name.to_string(), date), label)
        })
        .collect()
}

/// Fills `curve_label` on every row from its group's label.
///
/// Left-join semantics: rows whose group has no label get `Unknown`.
#[must_use]
pub fn merge_curve_labels(mut rows: Vec<ImpactRow>, proxies: &CurveProxies) -> Vec<ImpactRow> {
    let labels = curve_labels(&rows, proxies);
    debug!(groups = labels.len(), short = %proxies.short, long = %proxies.long, "merging curve labels");

    for row in &mut rows {
        let key = (row.event_name.clone(), row.event_date_trading);
        row.curve_label = Some(labels.get(&key).copied().unwrap_or_default());
    }
    rows
}
