//! # Tremor Analytics
//!
//! Event impact analytics for the Tremor macro event tracker.
//!
//! Given an [`EventStore`](tremor_core::EventStore) and a
//! [`PriceSeries`](tremor_core::PriceSeries), this crate builds the event
//! impact table: for every event and every ticker, the same-day, next-day
//! and two-day returns around the event's trading day, their
//! volatility-normalized z-scores, and a yield-curve reaction label.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: inputs are explicit, nothing is cached between runs
//! - **Undefined is explicit**: missing data becomes `None`, never zero
//! - **Deterministic order**: output order never depends on parallelism
//!
//! ## Quick Start
//!
//! ```rust
//! use tremor_analytics::prelude::*;
//! use tremor_core::prelude::*;
//!
//! let d = |s: &str| Date::parse(s).unwrap();
//! let prices = PriceSeries::from_rows(
//!     vec!["SHY".into(), "TLT".into()],
//!     vec![
//!         (d("2024-01-04"), vec![Some(80.0), Some(95.0)]),
//!         (d("2024-01-05"), vec![Some(79.9), Some(94.0)]),
//!         (d("2024-01-08"), vec![Some(80.0), Some(94.2)]),
//!     ],
//! )
//! .unwrap();
//! let events = EventStore::from_events(vec![Event::new("NFP", d("2024-01-05"), "US")]);
//!
//! let run = ImpactPipeline::new(ImpactConfig::default().with_z_window(2), CurveProxies::default())
//!     .run(&events, &prices)
//!     .unwrap();
//! assert_eq!(run.rows.len(), 2);
//! assert_eq!(run.rows[0].curve_label, Some(CurveLabel::BearSteepening));
//! ```
//!
//! ## Module Overview
//!
//! - [`returns`] - Simple returns and rolling z-scores
//! - [`impact`] - Per-event, per-ticker impact rows
//! - [`curve`] - Curve proxy classification and label merge
//! - [`reaction`] - Per-event views and summaries
//! - [`pipeline`] - Horizon filter, compute and merge in one run
//!
//! ## Feature Flags
//!
//! - `parallel`: rayon-based per-event computation above a threshold

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod curve;
pub mod impact;
pub mod parallel;
pub mod pipeline;
pub mod reaction;
pub mod returns;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{classify_curve_move, curve_labels, merge_curve_labels, CurveProxies};
    pub use crate::impact::{compute_event_impacts, two_day_return, ImpactComputer, ImpactConfig, ImpactRow};
    pub use crate::pipeline::{ImpactPipeline, ImpactRun};
    pub use crate::reaction::{
        default_key_assets, event_pairs, format_pct, format_z, Direction, EventPair, EventReaction, KeyAsset,
        ReactionSummary,
    };
    pub use crate::returns::{returns, zscores, ReturnTable, WindowAlignment, ZScoreTable};
}

pub use curve::{classify_curve_move, merge_curve_labels, CurveProxies};
pub use impact::{compute_event_impacts, ImpactComputer, ImpactConfig, ImpactRow};
pub use parallel::maybe_parallel_map;
pub use pipeline::{ImpactPipeline, ImpactRun};
pub use reaction::{event_pairs, EventPair, EventReaction, KeyAsset, ReactionSummary};
pub use returns::WindowAlignment;
