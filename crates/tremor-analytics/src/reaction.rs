//! Per-event reaction views and rule-based summaries.
//!
//! An event "pair" is an `(event_name, event_date_trading)` combination, the
//! unit a dashboard selects and a report is exported for. [`EventReaction`]
//! gathers the rows of one pair together with the source event details.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use tremor_core::{CurveLabel, Date, Event, EventStore};

use crate::impact::ImpactRow;

/// Placeholder rendered for undefined values.
pub const UNDEFINED_MARKER: &str = "—";

/// One `(event_name, event_date_trading)` combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventPair {
    /// Event name.
    pub event_name: String,
    /// Trading date the event was mapped to.
    pub event_date_trading: Date,
}

/// Unique event pairs of an impact table, sorted by name then date.
#[must_use]
pub fn event_pairs(rows: &[ImpactRow]) -> Vec<EventPair> {
    rows.iter()
        .map(|r| EventPair {
            event_name: r.event_name.clone(),
            event_date_trading: r.event_date_trading,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// An asset highlighted in summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAsset {
    /// Ticker.
    pub ticker: String,
    /// Human-readable label, e.g. "equities (SPY)".
    pub label: String,
}

impl KeyAsset {
    /// Creates a key asset.
    pub fn new(ticker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            label: label.into(),
        }
    }
}

/// Default key assets: equities, dollar, long bonds, gold, oil.
#[must_use]
pub fn default_key_assets() -> Vec<KeyAsset> {
    vec![
        KeyAsset::new("SPY", "equities (SPY)"),
        KeyAsset::new("UUP", "USD (UUP)"),
        KeyAsset::new("TLT", "long bonds (TLT)"),
        KeyAsset::new("GLD", "gold (GLD)"),
        KeyAsset::new("USO", "oil (USO)"),
    ]
}

/// Direction of a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive return.
    Up,
    /// Negative return.
    Down,
    /// Exactly zero.
    Flat,
    /// Return undefined.
    Unavailable,
}

impl Direction {
    /// Direction of an optional return.
    #[must_use]
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => Self::Up,
            Some(v) if v < 0.0 => Self::Down,
            Some(v) if v == 0.0 => Self::Flat,
            _ => Self::Unavailable,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
            Self::Unavailable => "n/a",
        })
    }
}

/// Formats a return as a percentage with two decimals.
#[must_use]
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => UNDEFINED_MARKER.to_string(),
    }
}

/// Formats a z-score with two decimals.
#[must_use]
pub fn format_z(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => UNDEFINED_MARKER.to_string(),
    }
}

/// All rows of one event pair plus its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReaction {
    /// The selected pair.
    pub pair: EventPair,
    /// Curve label shared by the group (`Unknown` if never merged).
    pub curve_label: CurveLabel,
    /// Raw (scheduled) dates that mapped onto this trading date, ascending.
    pub raw_dates: Vec<Date>,
    /// Source event matching the name and earliest raw date.
    pub event: Option<Event>,
    /// The group's rows, in table order.
    pub rows: Vec<ImpactRow>,
}

impl EventReaction {
    /// Selects the rows of one pair. `None` if the pair has no rows.
    #[must_use]
    pub fn select(rows: &[ImpactRow], event_name: &str, trading_date: Date, events: &EventStore) -> Option<Self> {
        let group: Vec<ImpactRow> = rows
            .iter()
            .filter(|r| r.event_name == event_name && r.event_date_trading == trading_date)
            .cloned()
            .collect();
        if group.is_empty() {
            return None;
        }

        let curve_label = group
            .iter()
            .find_map(|r| r.curve_label)
            .unwrap_or_default();
        let raw_dates: Vec<Date> = group
            .iter()
            .map(|r| r.event_date_raw)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let event = raw_dates
            .first()
            .and_then(|raw| events.find(event_name, *raw))
            .cloned();

        Some(Self {
            pair: EventPair {
                event_name: event_name.to_string(),
                event_date_trading: trading_date,
            },
            curve_label,
            raw_dates,
            event,
            rows: group,
        })
    }

    /// First row for a ticker.
    #[must_use]
    pub fn row(&self, ticker: &str) -> Option<&ImpactRow> {
        self.rows.iter().find(|r| r.ticker == ticker)
    }

    /// Builds the headline and one line per key asset present in the group.
    #[must_use]
    pub fn summary(&self, key_assets: &[KeyAsset]) -> ReactionSummary {
        let headline = format!(
            "{} on {} shows a {} curve proxy reaction.",
            self.pair.event_name,
            self.pair.event_date_trading,
            self.curve_label.display_name()
        );

        let lines = key_assets
            .iter()
            .filter_map(|asset| {
                let row = self.row(&asset.ticker)?;
                Some(format!(
                    "- {}: same-day {} ({}), next-day {} ({})",
                    asset.label,
                    Direction::of(row.same_day_return),
                    format_pct(row.same_day_return),
                    Direction::of(row.next_day_return),
                    format_pct(row.next_day_return),
                ))
            })
            .collect();

        ReactionSummary { headline, lines }
    }
}

/// Rule-based text summary of an event reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSummary {
    /// Headline sentence.
    pub headline: String,
    /// One bullet line per key asset.
    pub lines: Vec<String>,
}

impl fmt::Display for ReactionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline)?;
        for line in &self.lines {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}
