//! Trading calendars and event-date mapping.
//!
//! The calendar that matters for event studies is the *observed* one: the
//! set of dates on which prices were recorded. [`TradingCalendar`] wraps
//! that sorted set and performs the forward-search mapping of event dates
//! onto trading days. Rule-based calendars ([`WeekendCalendar`]) are kept
//! for generating synthetic calendars.

mod weekend;

pub use weekend::WeekendCalendar;

use crate::error::{TremorError, TremorResult};
use crate::types::Date;

/// Trait for rule-based business day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }

    /// All business days between `start` and `end`, inclusive.
    fn business_days(&self, start: Date, end: Date) -> Vec<Date> {
        start
            .iter_through(end)
            .filter(|d| self.is_business_day(*d))
            .collect()
    }
}

/// Maps an event date onto a trading day.
///
/// - A date present in `trading_days` is returned unchanged.
/// - Otherwise the first trading day strictly after it is returned
///   (weekends and holidays roll forward).
/// - A date after the last trading day clamps to the last trading day;
///   callers must detect that boundary case themselves.
///
/// `trading_days` must be sorted ascending.
///
/// # Errors
///
/// Returns `TremorError::InvalidInput` if `trading_days` is empty.
pub fn map_to_trading_day(event_date: Date, trading_days: &[Date]) -> TremorResult<Date> {
    let last = *trading_days
        .last()
        .ok_or_else(|| TremorError::invalid_input("trading calendar is empty"))?;

    // first index with day >= event_date
    let pos = trading_days.partition_point(|d| *d < event_date);
    Ok(trading_days.get(pos).copied().unwrap_or(last))
}

/// The set of observed trading days, strictly increasing and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingCalendar {
    days: Vec<Date>,
}

impl TradingCalendar {
    /// Creates a calendar from observed trading days.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if `days` is empty or not
    /// strictly increasing.
    pub fn new(days: Vec<Date>) -> TremorResult<Self> {
        if days.is_empty() {
            return Err(TremorError::invalid_input("trading calendar is empty"));
        }
        if let Some(w) = days.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TremorError::invalid_input(format!(
                "trading days must be strictly increasing: {} followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self { days })
    }

    /// Builds a calendar of every business day of `calendar` in `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::InvalidInput` if the range holds no business day.
    pub fn from_calendar<C: Calendar + ?Sized>(calendar: &C, start: Date, end: Date) -> TremorResult<Self> {
        Self::new(calendar.business_days(start, end))
    }

    /// The trading days, ascending.
    #[must_use]
    pub fn days(&self) -> &[Date] {
        &self.days
    }

    /// Number of trading days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false; an empty calendar cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First trading day.
    #[must_use]
    pub fn first(&self) -> Date {
        self.days[0]
    }

    /// Last trading day.
    #[must_use]
    pub fn last(&self) -> Date {
        self.days[self.days.len() - 1]
    }

    /// Position of `date` in the calendar, if it is a trading day.
    #[must_use]
    pub fn position(&self, date: Date) -> Option<usize> {
        self.days.binary_search(&date).ok()
    }

    /// Returns true if `date` is a trading day.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.position(date).is_some()
    }

    /// Maps an event date onto a trading day (see [`map_to_trading_day`]).
    #[must_use]
    pub fn map_date(&self, event_date: Date) -> Date {
        // days is non-empty by construction
        map_to_trading_day(event_date, &self.days).unwrap_or_else(|_| self.last())
    }

    /// The trading days immediately before and after position `pos`.
    ///
    /// `None` for the first and last positions, which have no neighbour on
    /// one side.
    #[must_use]
    pub fn neighbors(&self, pos: usize) -> Option<(Date, Date)> {
        if pos == 0 || pos + 1 >= self.days.len() {
            return None;
        }
        Some((self.days[pos - 1], self.days[pos + 1]))
    }
}

impl Calendar for TradingCalendar {
    fn name(&self) -> &str {
        "Observed trading days"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.contains(date)
    }

    fn next_business_day(&self, date: Date) -> Date {
        self.map_date(date)
    }
}
