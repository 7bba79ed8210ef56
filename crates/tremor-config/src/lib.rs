//! Tremor Configuration Layer
//!
//! This crate loads, validates and renders the settings of an impact run:
//! the z-score window and its alignment, the yield-curve proxy tickers, the
//! key assets listed in reaction summaries, the price request window and
//! the parallelism threshold.
//!
//! # Features
//!
//! - **File formats**: TOML or JSON, chosen by file extension
//! - **Defaults**: every field is optional in a file
//! - **Validation**: all rule violations are collected, not just the first
//!
//! # Example
//!
//! ```rust
//! use tremor_config::{ConfigFormat, TrackerConfig, Validate};
//!
//! let config = TrackerConfig::parse("z_window = 20\nshort_proxy = \"IEI\"\n", ConfigFormat::Toml).unwrap();
//! assert!(config.is_valid());
//! assert_eq!(config.impact_config().z_window, 20);
//! assert_eq!(config.curve_proxies().long, "TLT");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod tracker;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use tracker::{ConfigFormat, TrackerConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::tracker::{ConfigFormat, TrackerConfig};
}
