//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// No impact rows for the requested event and trading date.
    #[error("No impact rows for event '{event}' on trading date {date}. Run `tremor pairs` to list available pairs.")]
    UnknownPair {
        /// Event name.
        event: String,
        /// Trading date as given.
        date: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
