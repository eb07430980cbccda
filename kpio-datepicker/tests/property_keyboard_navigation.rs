//! Property: keyboard navigation
//!
//! Horizontal arrows always land focus on the neighbouring calendar day,
//! crossing into the adjacent month when needed. Vertical arrows move a
//! week inside the month and jump to the first or last day of the adjacent
//! month at the edge.

use kpio_calendar::{CalendarDate, DisplayedMonth, FixedClock, WeekStart};
use kpio_datepicker::prelude::*;
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = CalendarDate> {
    (1990i32..2060, 1u32..=12, 1u32..=31).prop_filter_map("real date", |(y, m, d)| {
        CalendarDate::from_ymd(y, m, d).ok()
    })
}

fn arb_week_start() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

fn mount(page: &Page, selected: CalendarDate, week_start: WeekStart) -> Calendar {
    Calendar::new(
        page,
        CalendarOptions::new("body")
            .with_selected_date(selected)
            .with_week_start(week_start)
            .with_clock(FixedClock(selected)),
    )
    .unwrap()
}

/// Press `key` on the button for `date` and report where focus went.
fn press(calendar: &Calendar, page: &Page, date: CalendarDate, key: &str) -> Option<CalendarDate> {
    let button = calendar.day_button(date.day()).unwrap();
    page.focus(button);
    page.key_down(button, key);
    let focused = page.focused()?;
    let month = calendar.displayed_month();
    (1..=month.days_in_month())
        .find(|&day| calendar.day_button(day) == Some(focused))
        .and_then(|day| month.day(day))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn horizontal_arrows_step_one_day(date in arb_date(), week_start in arb_week_start()) {
        let page = Page::new();
        let calendar = mount(&page, date, week_start);

        let landed = press(&calendar, &page, date, "ArrowRight");
        let expected = date.add_days(1).unwrap();
        prop_assert_eq!(landed, Some(expected));
        prop_assert_eq!(calendar.displayed_month(), DisplayedMonth::of(expected));

        let landed = press(&calendar, &page, expected, "ArrowLeft");
        prop_assert_eq!(landed, Some(date));
        prop_assert_eq!(calendar.displayed_month(), DisplayedMonth::of(date));
        // Focus moves never change the selection.
        prop_assert_eq!(calendar.selected_date(), Some(date));
    }

    #[test]
    fn vertical_arrows_step_one_week(date in arb_date(), week_start in arb_week_start()) {
        let page = Page::new();
        let calendar = mount(&page, date, week_start);
        let month = DisplayedMonth::of(date);

        let landed = press(&calendar, &page, date, "ArrowDown");
        let expected = if date.day() + 7 <= month.days_in_month() {
            date.add_days(7).unwrap()
        } else {
            month.next().first_day()
        };
        prop_assert_eq!(landed, Some(expected));

        let page = Page::new();
        let calendar = mount(&page, date, week_start);
        let landed = press(&calendar, &page, date, "ArrowUp");
        let expected = if date.day() > 7 {
            date.add_days(-7).unwrap()
        } else {
            month.prev().last_day()
        };
        prop_assert_eq!(landed, Some(expected));
    }

    #[test]
    fn home_and_end_stay_in_month(date in arb_date()) {
        let page = Page::new();
        let calendar = mount(&page, date, WeekStart::Sunday);
        let month = DisplayedMonth::of(date);

        prop_assert_eq!(press(&calendar, &page, date, "Home"), Some(month.first_day()));
        prop_assert_eq!(press(&calendar, &page, date, "End"), Some(month.last_day()));
        prop_assert_eq!(calendar.displayed_month(), month);
    }
}
