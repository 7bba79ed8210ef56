//! # Tremor Core
//!
//! Core types for the Tremor macro event impact tracker.
//!
//! - **Events**: validated calendar of scheduled macro releases ([`EventStore`])
//! - **Prices**: date-indexed daily price table ([`PriceSeries`])
//! - **Calendars**: observed trading days and event-date mapping ([`TradingCalendar`])
//! - **Types**: `Date`, `CurveLabel`
//!
//! Everything here is synchronous and side-effect free apart from the
//! [`EventSource`] reads performed by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use tremor_core::prelude::*;
//!
//! let calendar = TradingCalendar::from_calendar(
//!     &WeekendCalendar,
//!     Date::parse("2024-01-01").unwrap(),
//!     Date::parse("2024-01-10").unwrap(),
//! )
//! .unwrap();
//!
//! // Saturday rolls forward to Monday
//! let mapped = calendar.map_date(Date::parse("2024-01-06").unwrap());
//! assert_eq!(mapped.to_string(), "2024-01-08");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::ref_option)]

pub mod calendars;
pub mod error;
pub mod events;
pub mod prices;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{map_to_trading_day, Calendar, TradingCalendar, WeekendCalendar};
    pub use crate::error::{TremorError, TremorResult};
    pub use crate::events::{Event, EventSource, EventStore, MemoryEventSource, RawEvent, RawEventBatch};
    pub use crate::prices::{PriceSeries, TickerCoverage};
    pub use crate::types::{CurveLabel, Date};
}

// Re-export commonly used types at crate root
pub use calendars::TradingCalendar;
pub use error::{TremorError, TremorResult};
pub use events::{Event, EventSource, EventStore};
pub use prices::PriceSeries;
pub use types::{CurveLabel, Date};
