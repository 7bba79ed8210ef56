//! Error types for the Tremor library.
//!
//! Every fatal condition of a batch run maps onto one of these variants.
//! Degraded market data (missing prices, boundary events, missing proxy
//! tickers) is never an error; it shows up as undefined fields or dropped
//! rows instead.

use thiserror::Error;

/// A specialized Result type for Tremor operations.
pub type TremorResult<T> = Result<T, TremorError>;

/// The main error type for Tremor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TremorError {
    /// One or more required fields are absent from an input.
    #[error("Schema error in {source_name}: missing required field(s) {missing:?}{}", line_suffix(.line))]
    Schema {
        /// Name of the input (file path or logical source name).
        source_name: String,
        /// The missing field names.
        missing: Vec<String>,
        /// 1-based record line, when the field is absent on one record only.
        line: Option<usize>,
    },

    /// A value could not be parsed.
    #[error("Parse error in {source_name}{}: field '{field}' has unparseable value '{value}'", line_suffix(.line))]
    Parse {
        /// Name of the input.
        source_name: String,
        /// 1-based record line.
        line: Option<usize>,
        /// Field that failed to parse.
        field: String,
        /// The offending raw value.
        value: String,
    },

    /// Precondition violation (empty calendar, bad window size, unsorted dates).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the violated precondition.
        reason: String,
    },

    /// Invalid calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// I/O failure while reading or writing an input/output.
    #[error("I/O error on {path}: {reason}")]
    Io {
        /// Path involved.
        path: String,
        /// Underlying reason.
        reason: String,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

impl TremorError {
    /// Creates a schema error for missing columns.
    #[must_use]
    pub fn schema(source_name: impl Into<String>, missing: Vec<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            missing,
            line: None,
        }
    }

    /// Creates a schema error for a field left empty on a single record.
    #[must_use]
    pub fn missing_value(source_name: impl Into<String>, field: impl Into<String>, line: usize) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            missing: vec![field.into()],
            line: Some(line),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(
        source_name: impl Into<String>,
        line: Option<usize>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            line,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for errors caused by the shape of the input rather than I/O.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Schema { .. } | Self::Parse { .. } | Self::InvalidInput { .. } | Self::InvalidDate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_source_and_fields() {
        let err = TremorError::schema("events.csv", vec!["country".into(), "date".into()]);
        let msg = err.to_string();
        assert!(msg.contains("events.csv"));
        assert!(msg.contains("country"));
        assert!(msg.contains("date"));
        assert!(!msg.contains("line"));
    }

    #[test]
    fn test_parse_error_includes_line() {
        let err = TremorError::parse("events.csv", Some(4), "date", "2024-13-45");
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("2024-13-45"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_io_is_not_validation() {
        let err = TremorError::io("prices.csv", "permission denied");
        assert!(!err.is_validation());
        assert!(err.to_string().contains("prices.csv"));
    }
}
