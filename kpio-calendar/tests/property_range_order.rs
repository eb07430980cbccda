//! Property: range ordering
//!
//! Two clicks in range mode always leave `start <= end`, whatever order the
//! dates arrive in, and a third click starts a fresh range.

use kpio_calendar::{CalendarDate, SelectionState};
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = CalendarDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| CalendarDate::from_ymd(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn two_clicks_are_ordered(d1 in arb_date(), d2 in arb_date()) {
        let state = SelectionState::empty_range().register_click(d1).register_click(d2);
        let (start, end) = (state.start().unwrap(), state.end().unwrap());
        prop_assert!(start <= end);
        prop_assert_eq!(start, d1.min(d2));
        prop_assert_eq!(end, d1.max(d2));
    }

    #[test]
    fn third_click_restarts(d1 in arb_date(), d2 in arb_date(), d3 in arb_date()) {
        let state = SelectionState::empty_range()
            .register_click(d1)
            .register_click(d2)
            .register_click(d3);
        prop_assert_eq!(state.start(), Some(d3));
        prop_assert_eq!(state.end(), None);
    }

    #[test]
    fn highlight_only_strictly_inside(d1 in arb_date(), d2 in arb_date(), day in arb_date()) {
        let state = SelectionState::range(Some(d1), Some(d2));
        let (start, end) = (d1.min(d2), d1.max(d2));
        prop_assert_eq!(state.is_highlighted(day), start < day && day < end);
    }
}
