//! Weekend-only calendar.

use super::Calendar;
use crate::types::Date;

/// A simple weekend-only calendar (no holidays).
///
/// Useful for synthetic price fixtures when no observed calendar exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        date.is_weekday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        let friday = Date::from_ymd(2024, 1, 5).unwrap();
        let saturday = Date::from_ymd(2024, 1, 6).unwrap();
        let monday = Date::from_ymd(2024, 1, 8).unwrap();

        assert!(cal.is_business_day(friday));
        assert!(!cal.is_business_day(saturday));
        assert_eq!(cal.next_business_day(saturday), monday);
        assert_eq!(cal.next_business_day(friday), friday);
        assert_eq!(cal.business_days(friday, monday), vec![friday, monday]);
    }
}
