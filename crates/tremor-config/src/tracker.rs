//! Tracker configuration.
//!
//! Every field has a default, so a configuration file only needs the keys it
//! changes.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tremor_analytics::curve::{CurveProxies, DEFAULT_LONG_PROXY, DEFAULT_SHORT_PROXY};
use tremor_analytics::impact::{ImpactConfig, DEFAULT_PARALLEL_THRESHOLD};
use tremor_analytics::reaction::{default_key_assets, KeyAsset};
use tremor_analytics::returns::{WindowAlignment, DEFAULT_Z_WINDOW, MIN_Z_WINDOW};
use tremor_core::events::{DEFAULT_PRICE_LAG_DAYS, DEFAULT_PRICE_LEAD_DAYS, MAX_PRICE_WINDOW_DAYS};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// TRACKER CONFIGURATION
// =============================================================================

/// Settings for an impact run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Rolling z-score window, in trading days.
    #[serde(default = "default_z_window")]
    pub z_window: usize,

    /// Whether the z-score window ends at `t-1` or `t`.
    #[serde(default)]
    pub window_alignment: WindowAlignment,

    /// Short-maturity curve proxy ticker.
    #[serde(default = "default_short_proxy")]
    pub short_proxy: String,

    /// Long-maturity curve proxy ticker.
    #[serde(default = "default_long_proxy")]
    pub long_proxy: String,

    /// Calendar days of prices to request before the first event.
    #[serde(default = "default_price_lead_days")]
    pub price_lead_days: i64,

    /// Calendar days of prices to request after the last event.
    #[serde(default = "default_price_lag_days")]
    pub price_lag_days: i64,

    /// Allow parallel per-event computation.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Event count above which computation goes parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Assets listed in reaction summaries, in display order.
    #[serde(default = "default_key_assets")]
    pub key_assets: Vec<KeyAsset>,
}

fn default_z_window() -> usize {
    DEFAULT_Z_WINDOW
}

fn default_short_proxy() -> String {
    DEFAULT_SHORT_PROXY.to_string()
}

fn default_long_proxy() -> String {
    DEFAULT_LONG_PROXY.to_string()
}

fn default_price_lead_days() -> i64 {
    DEFAULT_PRICE_LEAD_DAYS
}

fn default_price_lag_days() -> i64 {
    DEFAULT_PRICE_LAG_DAYS
}

fn default_true() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            z_window: default_z_window(),
            window_alignment: WindowAlignment::default(),
            short_proxy: default_short_proxy(),
            long_proxy: default_long_proxy(),
            price_lead_days: default_price_lead_days(),
            price_lag_days: default_price_lag_days(),
            parallel: true,
            parallel_threshold: default_parallel_threshold(),
            key_assets: default_key_assets(),
        }
    }
}

/// On-disk configuration format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for anything but `.toml` or `.json`.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

impl TrackerConfig {
    /// Loads and validates a configuration file (TOML or JSON by extension).
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, `UnsupportedFormat` for an
    /// unknown extension, `Deserialization` for malformed content, or a
    /// validation error.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::parse(&content, format)?;
        config.validate_or_error()?;
        debug!(path = %path.display(), "loaded tracker configuration");
        Ok(config)
    }

    /// Parses configuration text without validating it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Deserialization` for malformed content.
    pub fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
            ConfigFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }

    /// Renders the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialization` if rendering fails.
    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Writes the configuration in the format implied by the extension.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for an unknown extension or `Io` if the write fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let text = self.render(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, text).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Sets the z-score window.
    #[must_use]
    pub fn with_z_window(mut self, window: usize) -> Self {
        self.z_window = window;
        self
    }

    /// Sets the window alignment.
    #[must_use]
    pub fn with_window_alignment(mut self, alignment: WindowAlignment) -> Self {
        self.window_alignment = alignment;
        self
    }

    /// Sets both curve proxies.
    #[must_use]
    pub fn with_proxies(mut self, short: impl Into<String>, long: impl Into<String>) -> Self {
        self.short_proxy = short.into();
        self.long_proxy = long.into();
        self
    }

    /// Sets the price request window.
    #[must_use]
    pub fn with_price_window(mut self, lead_days: i64, lag_days: i64) -> Self {
        self.price_lead_days = lead_days;
        self.price_lag_days = lag_days;
        self
    }

    /// Sets the key assets.
    #[must_use]
    pub fn with_key_assets(mut self, key_assets: Vec<KeyAsset>) -> Self {
        self.key_assets = key_assets;
        self
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Settings for the impact computation.
    #[must_use]
    pub fn impact_config(&self) -> ImpactConfig {
        ImpactConfig::default()
            .with_z_window(self.z_window)
            .with_alignment(self.window_alignment)
            .with_parallel(self.parallel)
            .with_parallel_threshold(self.parallel_threshold)
    }

    /// The curve proxy pair.
    #[must_use]
    pub fn curve_proxies(&self) -> CurveProxies {
        CurveProxies::new(self.short_proxy.clone(), self.long_proxy.clone())
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.z_window < MIN_Z_WINDOW {
            errors.push(ValidationError::with_rule(
                "z_window",
                format!("Window {} is below the minimum of {MIN_Z_WINDOW}", self.z_window),
                "min_window",
            ));
        }

        if self.short_proxy.trim().is_empty() {
            errors.push(ValidationError::new("short_proxy", "Short proxy cannot be empty"));
        }
        if self.long_proxy.trim().is_empty() {
            errors.push(ValidationError::new("long_proxy", "Long proxy cannot be empty"));
        }
        if !self.short_proxy.is_empty() && self.short_proxy == self.long_proxy {
            errors.push(ValidationError::with_rule(
                "long_proxy",
                format!("Long proxy must differ from short proxy '{}'", self.short_proxy),
                "distinct_proxies",
            ));
        }

        for (field, days) in [
            ("price_lead_days", self.price_lead_days),
            ("price_lag_days", self.price_lag_days),
        ] {
            if days < 0 {
                errors.push(ValidationError::with_rule(field, "Days cannot be negative", "non_negative"));
            } else if days > MAX_PRICE_WINDOW_DAYS {
                errors.push(ValidationError::with_rule(
                    field,
                    format!("{days} days exceeds the maximum of {MAX_PRICE_WINDOW_DAYS}"),
                    "max_days",
                ));
            }
        }

        let mut seen = HashSet::new();
        for asset in &self.key_assets {
            if asset.ticker.trim().is_empty() {
                errors.push(ValidationError::new("key_assets", "Key asset ticker cannot be empty"));
            } else if !seen.insert(asset.ticker.as_str()) {
                errors.push(ValidationError::with_rule(
                    "key_assets",
                    format!("Duplicate key asset '{}'", asset.ticker),
                    "unique_tickers",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.z_window, 60);
        assert_eq!(config.window_alignment, WindowAlignment::Trailing);
        assert_eq!(config.short_proxy, "SHY");
        assert_eq!(config.long_proxy, "TLT");
        assert_eq!(config.price_lead_days, 10);
        assert_eq!(config.price_lag_days, 30);
        assert_eq!(config.parallel_threshold, 64);
        let tickers: Vec<&str> = config.key_assets.iter().map(|a| a.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SPY", "UUP", "TLT", "GLD", "USO"]);
        assert!(config.is_valid());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TrackerConfig::parse(
            "z_window = 20\nwindow_alignment = \"inclusive\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.z_window, 20);
        assert_eq!(config.window_alignment, WindowAlignment::Inclusive);
        assert_eq!(config.long_proxy, "TLT");
        assert_eq!(config.key_assets.len(), 5);
    }

    #[test]
    fn test_json_key_assets() {
        let config = TrackerConfig::parse(
            r#"{"short_proxy": "IEI", "key_assets": [{"ticker": "QQQ", "label": "tech (QQQ)"}]}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.short_proxy, "IEI");
        assert_eq!(config.key_assets, vec![KeyAsset::new("QQQ", "tech (QQQ)")]);
    }

    #[test]
    fn test_validation_rules() {
        let config = TrackerConfig::default()
            .with_z_window(1)
            .with_proxies("TLT", "TLT")
            .with_price_window(-1, 30)
            .with_key_assets(vec![KeyAsset::new("SPY", "a"), KeyAsset::new("SPY", "b")]);
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["z_window", "long_proxy", "price_lead_days", "key_assets"]);
        assert!(matches!(
            config.validate_or_error(),
            Err(ConfigError::MultipleValidationErrors(_))
        ));
    }

    #[test]
    fn test_price_window_upper_bound() {
        let config = TrackerConfig::default().with_price_window(400_000_000, MAX_PRICE_WINDOW_DAYS + 1);
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["price_lead_days", "price_lag_days"]);
        assert!(errors.iter().all(|e| e.rule.as_deref() == Some("max_days")));
        assert!(TrackerConfig::default()
            .with_price_window(MAX_PRICE_WINDOW_DAYS, MAX_PRICE_WINDOW_DAYS)
            .is_valid());
    }

    #[test]
    fn test_impact_config_conversion() {
        let impact = TrackerConfig::default()
            .with_z_window(30)
            .with_window_alignment(WindowAlignment::Inclusive)
            .with_parallel_threshold(8)
            .impact_config();
        assert_eq!(impact.z_window, 30);
        assert_eq!(impact.alignment, WindowAlignment::Inclusive);
        assert_eq!(impact.parallel_threshold, 8);
        assert!(impact.parallel);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/tremor.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("tremor.JSON")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("tremor.yaml")).is_err());
    }
}
