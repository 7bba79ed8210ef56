//! # Tremor
//!
//! Measures how assets react to scheduled macro releases. Events are mapped
//! to trading days, same-day and next-day returns and rolling z-scores are
//! read off a wide price table, and every event is labelled by the move of
//! a short and a long bond proxy.
//!
//! This crate bundles the workspace:
//!
//! - [`core`]: dates, events, trading calendars and price tables
//! - [`analytics`]: returns, z-scores, the impact table and curve labels
//! - [`config`]: tracker settings from TOML or JSON
//! - [`file`]: CSV sources and impact table writers
//!
//! ```rust
//! use tremor::prelude::*;
//!
//! let mut source = EventCsvSource::from_reader(
//!     "events.csv",
//!     "event_name,date,country\nCPI,2024-01-06,US\n".as_bytes(),
//! )
//! .unwrap();
//! let events = EventStore::load(&mut source).unwrap();
//!
//! let prices = PriceCsvSource::new("prices.csv")
//!     .read(
//!         "date,SHY,TLT\n\
//!          2024-01-04,82.00,98.50\n\
//!          2024-01-05,82.05,97.00\n\
//!          2024-01-08,81.95,96.20\n\
//!          2024-01-09,82.00,96.90\n"
//!             .as_bytes(),
//!     )
//!     .unwrap();
//!
//! let config = TrackerConfig::default().with_z_window(2);
//! let run = ImpactPipeline::new(config.impact_config(), config.curve_proxies())
//!     .run(&events, &prices)
//!     .unwrap();
//!
//! assert_eq!(run.rows.len(), 2);
//! assert_eq!(run.rows[0].curve_label, Some(CurveLabel::BearSteepening));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub use tremor_analytics as analytics;
pub use tremor_config as config;
pub use tremor_core as core;
pub use tremor_ext_file as file;

/// Everything needed for a typical impact run.
pub mod prelude {
    pub use tremor_analytics::prelude::*;
    pub use tremor_config::prelude::*;
    pub use tremor_core::prelude::*;
    pub use tremor_ext_file::{EventCsvSource, ImpactWriter, PriceCsvSource, TableFormat};
}
