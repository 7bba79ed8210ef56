//! Property tests for trading-day mapping.
//!
//! - A trading day maps to itself
//! - A non-trading day maps to the first later trading day
//! - Dates past the calendar clamp to the last trading day
//! - The mapped date is never earlier than the event date, except when clamped

use proptest::prelude::*;
use tremor_core::calendars::map_to_trading_day;
use tremor_core::prelude::*;

fn base() -> Date {
    Date::from_ymd(2024, 1, 1).unwrap()
}

/// A strictly increasing calendar built from positive day gaps.
fn calendar_from_gaps(gaps: &[i64]) -> Vec<Date> {
    let mut day = base();
    gaps.iter()
        .map(|gap| {
            day = day.add_days(*gap);
            day
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_trading_day_maps_to_itself(gaps in prop::collection::vec(1i64..5, 1..40), pick in 0usize..40) {
        let days = calendar_from_gaps(&gaps);
        let date = days[pick % days.len()];
        prop_assert_eq!(map_to_trading_day(date, &days).unwrap(), date);
    }

    #[test]
    fn prop_maps_to_first_later_day(gaps in prop::collection::vec(1i64..5, 1..40), offset in 0i64..200) {
        let days = calendar_from_gaps(&gaps);
        let event = base().add_days(offset);
        let mapped = map_to_trading_day(event, &days).unwrap();

        match days.iter().find(|d| **d >= event) {
            Some(expected) => {
                prop_assert_eq!(mapped, *expected);
                prop_assert!(mapped >= event);
            }
            None => prop_assert_eq!(mapped, *days.last().unwrap()),
        }
    }

    #[test]
    fn prop_calendar_and_free_function_agree(gaps in prop::collection::vec(1i64..5, 1..40), offset in 0i64..200) {
        let days = calendar_from_gaps(&gaps);
        let calendar = TradingCalendar::new(days.clone()).unwrap();
        let event = base().add_days(offset);
        prop_assert_eq!(calendar.map_date(event), map_to_trading_day(event, &days).unwrap());
    }
}

#[test]
fn weekend_event_maps_to_monday() {
    let calendar = TradingCalendar::from_calendar(
        &WeekendCalendar,
        Date::parse("2024-01-01").unwrap(),
        Date::parse("2024-01-10").unwrap(),
    )
    .unwrap();

    let saturday = Date::parse("2024-01-06").unwrap();
    let monday = calendar.map_date(saturday);
    assert_eq!(monday, Date::parse("2024-01-08").unwrap());

    let pos = calendar.position(monday).unwrap();
    let (prev, next) = calendar.neighbors(pos).unwrap();
    assert_eq!(prev, Date::parse("2024-01-05").unwrap());
    assert_eq!(next, Date::parse("2024-01-09").unwrap());
}
