//! Yield-curve reaction labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TremorError;

/// Shape of the short-end/long-end reaction implied by two bond proxies.
///
/// Proxy prices move inversely to yields: both proxies falling is a bear
/// move (yields up), both rising is a bull move (yields down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveLabel {
    /// Yields up, long end up more.
    BearSteepening,
    /// Yields up, short end up at least as much.
    BearFlattening,
    /// Yields down, long end down more.
    BullSteepening,
    /// Yields down, short end down at least as much.
    BullFlattening,
    /// Proxies moved in different directions (or one was unchanged).
    Twist,
    /// A proxy return was unavailable.
    Unknown,
}

impl CurveLabel {
    /// All labels in declaration order.
    pub const ALL: [CurveLabel; 6] = [
        CurveLabel::BearSteepening,
        CurveLabel::BearFlattening,
        CurveLabel::BullSteepening,
        CurveLabel::BullFlattening,
        CurveLabel::Twist,
        CurveLabel::Unknown,
    ];

    /// Returns the snake_case identifier used in exported tables.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BearSteepening => "bear_steepening",
            Self::BearFlattening => "bear_flattening",
            Self::BullSteepening => "bull_steepening",
            Self::BullFlattening => "bull_flattening",
            Self::Twist => "twist",
            Self::Unknown => "unknown",
        }
    }

    /// Returns a human-readable form ("bear steepening").
    #[must_use]
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Returns true when a classification was possible.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl Default for CurveLabel {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for CurveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveLabel {
    type Err = TremorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s.trim())
            .ok_or_else(|| TremorError::invalid_input(format!("unknown curve label: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_forms() {
        assert_eq!(CurveLabel::BearSteepening.to_string(), "bear_steepening");
        assert_eq!(CurveLabel::BullFlattening.display_name(), "bull flattening");
        assert_eq!(
            serde_json::to_string(&CurveLabel::Twist).unwrap(),
            "\"twist\""
        );
    }

    #[test]
    fn test_parse_all() {
        for label in CurveLabel::ALL {
            assert_eq!(label.as_str().parse::<CurveLabel>().unwrap(), label);
        }
        assert!("sideways".parse::<CurveLabel>().is_err());
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(CurveLabel::default(), CurveLabel::Unknown);
        assert!(!CurveLabel::default().is_known());
    }
}
