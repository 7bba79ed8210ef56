//! Daily returns and volatility-normalized z-scores.
//!
//! Returns are simple: `r_t = p_t / p_{t-1} - 1`, undefined when either
//! price is missing and always undefined on the first date.
//!
//! A z-score here is `r_t / σ`, where σ is the sample standard deviation
//! (n − 1) of a rolling window of `W` returns. It is not centred on a mean.
//! The window must hold `W` defined returns; otherwise, or when σ is zero,
//! the z-score is undefined.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use tremor_core::{Date, PriceSeries, TremorError, TremorResult};

/// Default rolling window, in trading days.
pub const DEFAULT_Z_WINDOW: usize = 60;

/// Smallest usable window (a sample std needs two observations).
pub const MIN_Z_WINDOW: usize = 2;

/// Which returns the volatility window covers when normalizing day `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAlignment {
    /// The `W` returns ending at `t-1`; day `t` never normalizes itself.
    #[default]
    Trailing,
    /// The `W` returns ending at `t`, as a plain rolling std over the
    /// return series computes it.
    Inclusive,
}

impl WindowAlignment {
    /// Returns the snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trailing => "trailing",
            Self::Inclusive => "inclusive",
        }
    }

    /// Row range `[start, end)` of the window for row `t`, if it fits.
    fn window(self, t: usize, size: usize) -> Option<(usize, usize)> {
        match self {
            Self::Trailing => (t >= size).then(|| (t - size, t)),
            Self::Inclusive => (t + 1 >= size).then(|| (t + 1 - size, t + 1)),
        }
    }
}

impl std::str::FromStr for WindowAlignment {
    type Err = TremorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trailing" => Ok(Self::Trailing),
            "inclusive" => Ok(Self::Inclusive),
            other => Err(TremorError::invalid_input(format!(
                "unknown window alignment '{other}' (use trailing or inclusive)"
            ))),
        }
    }
}

/// Checks a z-score window size.
///
/// # Errors
///
/// Returns `TremorError::InvalidInput` if `window < MIN_Z_WINDOW`.
pub fn validate_window(window: usize) -> TremorResult<()> {
    if window < MIN_Z_WINDOW {
        return Err(TremorError::invalid_input(format!(
            "z-score window must be at least {MIN_Z_WINDOW}, got {window}"
        )));
    }
    Ok(())
}

/// Simple returns of one price column.
#[must_use]
pub fn simple_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(prices.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(curr)) => Some(curr / prev - 1.0),
        _ => None,
    }));
    out
}

/// Sample standard deviation, `None` for fewer than two values or a
/// non-finite result.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sd = values.iter().std_dev();
    sd.is_finite().then_some(sd)
}

/// Rolling z-scores of one return column.
#[must_use]
pub fn rolling_zscores(returns: &[Option<f64>], window: usize, alignment: WindowAlignment) -> Vec<Option<f64>> {
    let mut scratch = Vec::with_capacity(window);
    (0..returns.len())
        .map(|t| {
            let r = returns[t]?;
            let (start, end) = alignment.window(t, window)?;
            scratch.clear();
            for value in &returns[start..end] {
                scratch.push((*value)?);
            }
            let sd = sample_std_dev(&scratch)?;
            if sd == 0.0 {
                return None;
            }
            let z = r / sd;
            z.is_finite().then_some(z)
        })
        .collect()
}

/// A derived per-date, per-ticker table of optional values.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl SeriesTable {
    /// Trading dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Tickers in column order.
    #[must_use]
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Value at a row position for a ticker position.
    #[must_use]
    pub fn at(&self, row: usize, ticker_index: usize) -> Option<f64> {
        self.columns.get(ticker_index)?.get(row).copied().flatten()
    }

    /// Value on a date for a ticker.
    #[must_use]
    pub fn get(&self, date: Date, ticker: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        let col = self.tickers.iter().position(|t| t == ticker)?;
        self.at(row, col)
    }

    /// Full column for a ticker.
    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        let col = self.tickers.iter().position(|t| t == ticker)?;
        Some(&self.columns[col])
    }
}

/// Daily simple returns for every ticker of a price table.
pub type ReturnTable = SeriesTable;

/// Rolling z-scores for every ticker of a return table.
pub type ZScoreTable = SeriesTable;

/// Computes simple returns for every ticker.
#[must_use]
pub fn returns(prices: &PriceSeries) -> ReturnTable {
    let columns = (0..prices.tickers().len())
        .map(|i| simple_returns(prices.column_at(i)))
        .collect();
    SeriesTable {
        dates: prices.dates().to_vec(),
        tickers: prices.tickers().to_vec(),
        columns,
    }
}

/// Computes rolling z-scores for every ticker.
///
/// # Errors
///
/// Returns `TremorError::InvalidInput` if `window < MIN_Z_WINDOW`.
pub fn zscores(returns: &ReturnTable, window: usize, alignment: WindowAlignment) -> TremorResult<ZScoreTable> {
    validate_window(window)?;
    debug!(window, alignment = alignment.as_str(), tickers = returns.tickers.len(), "computing z-scores");
    let columns = returns
        .columns
        .iter()
        .map(|c| rolling_zscores(c, window, alignment))
        .collect();
    Ok(SeriesTable {
        dates: returns.dates.clone(),
        tickers: returns.tickers.clone(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_returns() {
        let r = simple_returns(&[Some(100.0), Some(101.0), Some(99.0)]);
        assert_eq!(r[0], None);
        assert_eq!(r[1], Some(101.0 / 100.0 - 1.0));
        assert_eq!(r[2], Some(99.0 / 101.0 - 1.0));
        assert!(simple_returns(&[]).is_empty());
    }

    #[test]
    fn test_missing_price_breaks_both_adjacent_returns() {
        let r = simple_returns(&[Some(100.0), None, Some(102.0), Some(103.0)]);
        assert_eq!(r[1], None);
        assert_eq!(r[2], None);
        assert_eq!(r[3], Some(103.0 / 102.0 - 1.0));
    }

    #[test]
    fn test_sample_std_dev() {
        // sample std of 1..=4 is sqrt(5/3)
        assert_relative_eq!(
            sample_std_dev(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
            (5.0f64 / 3.0).sqrt(),
            epsilon = 1e-12
        );
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn test_trailing_window_excludes_current_day() {
        let returns = vec![None, Some(0.01), Some(-0.01), Some(0.04)];
        let z = rolling_zscores(&returns, 2, WindowAlignment::Trailing);

        // row 2 needs rows 0..2, row 0 is undefined
        assert_eq!(z[2], None);
        // row 3 uses rows 1..3 = [0.01, -0.01]
        let sd = sample_std_dev(&[0.01, -0.01]).unwrap();
        assert_relative_eq!(z[3].unwrap(), 0.04 / sd, epsilon = 1e-12);
    }

    #[test]
    fn test_inclusive_window_includes_current_day() {
        let returns = vec![None, Some(0.01), Some(-0.01), Some(0.04)];
        let z = rolling_zscores(&returns, 2, WindowAlignment::Inclusive);

        assert_eq!(z[1], None);
        let sd2 = sample_std_dev(&[0.01, -0.01]).unwrap();
        assert_relative_eq!(z[2].unwrap(), -0.01 / sd2, epsilon = 1e-12);
        let sd3 = sample_std_dev(&[-0.01, 0.04]).unwrap();
        assert_relative_eq!(z[3].unwrap(), 0.04 / sd3, epsilon = 1e-12);
    }

    #[test]
    fn test_alignments_differ_on_same_day() {
        let returns = vec![None, Some(0.01), Some(-0.02), Some(0.015), Some(0.05)];
        let trailing = rolling_zscores(&returns, 3, WindowAlignment::Trailing);
        let inclusive = rolling_zscores(&returns, 3, WindowAlignment::Inclusive);
        assert!(trailing[4].is_some() && inclusive[4].is_some());
        assert!((trailing[4].unwrap() - inclusive[4].unwrap()).abs() > 1e-6);
    }

    #[test]
    fn test_zero_volatility_is_undefined() {
        let returns = vec![None, Some(0.0), Some(0.0), Some(0.01)];
        let z = rolling_zscores(&returns, 2, WindowAlignment::Trailing);
        assert_eq!(z[3], None);
    }

    #[test]
    fn test_gap_in_window_is_undefined() {
        let returns = vec![None, Some(0.01), None, Some(0.02), Some(0.03)];
        let z = rolling_zscores(&returns, 2, WindowAlignment::Trailing);
        assert_eq!(z[3], None);
        assert_eq!(z[4], None);
    }

    #[test]
    fn test_window_validation() {
        assert!(validate_window(1).is_err());
        assert!(validate_window(2).is_ok());
        assert!("Inclusive".parse::<WindowAlignment>().is_ok());
        assert!("centered".parse::<WindowAlignment>().is_err());
    }

    #[test]
    fn test_tables() {
        let d = |s: &str| Date::parse(s).unwrap();
        let prices = PriceSeries::from_rows(
            vec!["A".into()],
            vec![
                (d("2024-01-02"), vec![Some(100.0)]),
                (d("2024-01-03"), vec![Some(101.0)]),
                (d("2024-01-04"), vec![Some(99.0)]),
            ],
        )
        .unwrap();
        let table = returns(&prices);
        assert_eq!(table.get(d("2024-01-02"), "A"), None);
        assert_eq!(table.get(d("2024-01-03"), "A"), Some(101.0 / 100.0 - 1.0));
        assert!(zscores(&table, 1, WindowAlignment::Trailing).is_err());
        let z = zscores(&table, 2, WindowAlignment::Inclusive).unwrap();
        assert_eq!(z.column("A").unwrap().len(), 3);
    }
}
