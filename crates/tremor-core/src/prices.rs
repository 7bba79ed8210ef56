//! Daily price table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendars::TradingCalendar;
use crate::error::{TremorError, TremorResult};
use crate::types::Date;

/// Date-indexed table of daily prices, one column per ticker.
///
/// Dates are strictly increasing; each date is a trading day by
/// construction. A price may be missing for any ticker on any date. Prices
/// that are present are finite and strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<Date>,
    tickers: Vec<String>,
    // column-major: columns[ticker][date]
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceSeries {
    /// Creates a price table from column-major data.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if dates are not strictly
    /// increasing, tickers repeat, a column length differs from the date
    /// count, or a price is non-finite or not positive.
    pub fn new(dates: Vec<Date>, tickers: Vec<String>, columns: Vec<Vec<Option<f64>>>) -> TremorResult<Self> {
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TremorError::invalid_input(format!(
                "price dates must be strictly increasing: {} followed by {}",
                w[0], w[1]
            )));
        }
        if tickers.len() != columns.len() {
            return Err(TremorError::invalid_input(format!(
                "{} tickers but {} price columns",
                tickers.len(),
                columns.len()
            )));
        }
        for (i, ticker) in tickers.iter().enumerate() {
            if ticker.trim().is_empty() {
                return Err(TremorError::invalid_input("empty ticker name"));
            }
            if tickers[..i].contains(ticker) {
                return Err(TremorError::invalid_input(format!("duplicate ticker: {ticker}")));
            }
        }
        for (ticker, column) in tickers.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(TremorError::invalid_input(format!(
                    "ticker {ticker} has {} prices for {} dates",
                    column.len(),
                    dates.len()
                )));
            }
            if let Some((i, p)) = column
                .iter()
                .enumerate()
                .find_map(|(i, p)| p.filter(|v| !v.is_finite() || *v <= 0.0).map(|v| (i, v)))
            {
                return Err(TremorError::invalid_input(format!(
                    "ticker {ticker} has invalid price {p} on {}",
                    dates[i]
                )));
            }
        }
        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Creates a price table from row-major data: one `(date, prices)` row
    /// per trading day, prices ordered like `tickers`.
    ///
    /// # Errors
    ///
    /// See [`PriceSeries::new`]; additionally fails if a row's width differs
    /// from the ticker count.
    pub fn from_rows(tickers: Vec<String>, rows: Vec<(Date, Vec<Option<f64>>)>) -> TremorResult<Self> {
        let mut dates = Vec::with_capacity(rows.len());
        let mut columns = vec![Vec::with_capacity(rows.len()); tickers.len()];
        for (date, prices) in rows {
            if prices.len() != tickers.len() {
                return Err(TremorError::invalid_input(format!(
                    "row {date} has {} prices for {} tickers",
                    prices.len(),
                    tickers.len()
                )));
            }
            dates.push(date);
            for (column, price) in columns.iter_mut().zip(prices) {
                column.push(price);
            }
        }
        Self::new(dates, tickers, columns)
    }

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

    /// Number of trading days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Last trading date, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Price column for a ticker.
    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.ticker_index(ticker).map(|i| self.columns[i].as_slice())
    }

    /// Price column by ticker position.
    #[must_use]
    pub fn column_at(&self, index: usize) -> &[Option<f64>] {
        &self.columns[index]
    }

    /// Position of a ticker.
    #[must_use]
    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Price of `ticker` on `date`, if observed.
    #[must_use]
    pub fn price(&self, date: Date, ticker: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(ticker)?[row]
    }

    /// The observed trading calendar.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if the table is empty.
    pub fn trading_calendar(&self) -> TremorResult<TradingCalendar> {
        TradingCalendar::new(self.dates.clone())
    }

    /// Drops dates on which no ticker has a price.
    #[must_use]
    pub fn without_empty_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&row| self.columns.iter().any(|c| c[row].is_some()))
            .collect();
        if keep.len() < self.dates.len() {
            debug!(dropped = self.dates.len() - keep.len(), "dropped all-empty price rows");
        }
        Self {
            dates: keep.iter().map(|&row| self.dates[row]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| keep.iter().map(|&row| c[row]).collect())
                .collect(),
        }
    }

    /// Per-ticker observation counts and missing share.
    #[must_use]
    pub fn coverage(&self) -> Vec<TickerCoverage> {
        self.tickers
            .iter()
            .zip(&self.columns)
            .map(|(ticker, column)| {
                let observed: Vec<Date> = column
                    .iter()
                    .zip(&self.dates)
                    .filter_map(|(p, d)| p.map(|_| *d))
                    .collect();
                let missing = column.len() - observed.len();
                let missing_pct = if column.is_empty() {
                    0.0
                } else {
                    missing as f64 / column.len() as f64 * 100.0
                };
                TickerCoverage {
                    ticker: ticker.clone(),
                    observations: observed.len(),
                    missing,
                    missing_pct,
                    first_date: observed.first().copied(),
                    last_date: observed.last().copied(),
                }
            })
            .collect()
    }
}

/// Data-quality summary for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerCoverage {
    /// Ticker.
    pub ticker: String,
    /// Dates with a price.
    pub observations: usize,
    /// Dates without a price.
    pub missing: usize,
    /// Missing share of all trading dates, in percent.
    pub missing_pct: f64,
    /// First date with a price.
    pub first_date: Option<Date>,
    /// Last date with a price.
    pub last_date: Option<Date>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn sample() -> PriceSeries {
        PriceSeries::from_rows(
            vec!["SPY".into(), "TLT".into()],
            vec![
                (d("2024-01-02"), vec![Some(470.0), Some(98.0)]),
                (d("2024-01-03"), vec![None, None]),
                (d("2024-01-04"), vec![Some(468.0), None]),
                (d("2024-01-05"), vec![Some(469.0), Some(97.5)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let prices = sample();
        assert_eq!(prices.len(), 4);
        assert_eq!(prices.price(d("2024-01-04"), "SPY"), Some(468.0));
        assert_eq!(prices.price(d("2024-01-04"), "TLT"), None);
        assert_eq!(prices.price(d("2024-01-06"), "SPY"), None);
        assert_eq!(prices.price(d("2024-01-02"), "GLD"), None);
        assert_eq!(prices.last_date(), Some(d("2024-01-05")));
    }

    #[test]
    fn test_rejects_unsorted_dates() {
        let err = PriceSeries::from_rows(
            vec!["SPY".into()],
            vec![(d("2024-01-03"), vec![Some(1.0)]), (d("2024-01-02"), vec![Some(1.0)])],
        )
        .unwrap_err();
        assert!(matches!(err, TremorError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_duplicate_dates_and_tickers() {
        assert!(PriceSeries::from_rows(
            vec!["SPY".into()],
            vec![(d("2024-01-02"), vec![Some(1.0)]), (d("2024-01-02"), vec![Some(1.0)])],
        )
        .is_err());
        assert!(PriceSeries::new(vec![], vec!["SPY".into(), "SPY".into()], vec![vec![], vec![]]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let err = PriceSeries::from_rows(vec!["SPY".into()], vec![(d("2024-01-02"), vec![Some(0.0)])])
            .unwrap_err();
        assert!(err.to_string().contains("SPY"));
    }

    #[test]
    fn test_without_empty_rows() {
        let trimmed = sample().without_empty_rows();
        assert_eq!(trimmed.len(), 3);
        assert!(!trimmed.dates().contains(&d("2024-01-03")));
        assert_eq!(trimmed.column("TLT").unwrap(), &[Some(98.0), None, Some(97.5)]);
    }

    #[test]
    fn test_coverage() {
        let coverage = sample().coverage();
        assert_eq!(coverage[0].ticker, "SPY");
        assert_eq!(coverage[0].observations, 3);
        assert_relative_eq!(coverage[0].missing_pct, 25.0);
        assert_eq!(coverage[1].missing, 2);
        assert_relative_eq!(coverage[1].missing_pct, 50.0);
        assert_eq!(coverage[1].first_date, Some(d("2024-01-02")));
        assert_eq!(coverage[1].last_date, Some(d("2024-01-05")));
    }

    #[test]
    fn test_trading_calendar() {
        assert_eq!(sample().trading_calendar().unwrap().len(), 4);
        let empty = PriceSeries::new(vec![], vec![], vec![]).unwrap();
        assert!(empty.trading_calendar().is_err());
    }
}
