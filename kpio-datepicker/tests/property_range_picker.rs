//! Property: range picker consistency
//!
//! Whatever days a user clicks across the two calendars, the connector's
//! range stays ordered, both calendars highlight exactly the days strictly
//! inside it, and the two calendars remain one month apart. Rebuilding a
//! widget without changing its state never changes its markup.

use kpio_calendar::{CalendarDate, DayCell, FixedClock, WeekStart};
use kpio_datepicker::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Action {
    ClickLeft(u32),
    ClickRight(u32),
    Prev,
    Next,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (1u32..=28).prop_map(Action::ClickLeft),
        4 => (1u32..=28).prop_map(Action::ClickRight),
        1 => Just(Action::Prev),
        1 => Just(Action::Next),
    ]
}

fn arb_anchor() -> impl Strategy<Value = CalendarDate> {
    (2000i32..2040, 1u32..=12).prop_map(|(y, m)| CalendarDate::from_ymd(y, m, 1).unwrap())
}

fn highlighted(cells: &[DayCell]) -> Vec<CalendarDate> {
    cells
        .iter()
        .filter(|c| c.is_highlighted())
        .filter_map(|c| c.date)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn clicks_keep_both_calendars_consistent(
        anchor in arb_anchor(),
        actions in prop::collection::vec(arb_action(), 1..12),
    ) {
        let page = Page::new();
        let picker = RangePicker::new(
            &page,
            RangeOptions::new("body")
                .with_selected_date(anchor)
                .with_clock(FixedClock(anchor)),
        )
        .unwrap();

        for action in actions {
            match action {
                Action::ClickLeft(day) => {
                    page.click(picker.left().day_button(day).unwrap());
                }
                Action::ClickRight(day) => {
                    page.click(picker.right().day_button(day).unwrap());
                }
                Action::Prev => {
                    page.click(picker.left().prev_button().unwrap());
                }
                Action::Next => {
                    page.click(picker.right().next_button().unwrap());
                }
            }

            let (left, right) = picker.displayed_months();
            prop_assert_eq!(left.next(), right);

            let selection = picker.selection();
            if let (Some(start), Some(end)) = (selection.start(), selection.end()) {
                prop_assert!(start <= end);
            }
            for calendar in [picker.left(), picker.right()] {
                prop_assert_eq!(calendar.selection(), selection);
                for date in highlighted(&calendar.day_cells()) {
                    prop_assert!(selection.start().is_some_and(|s| s < date));
                    prop_assert!(selection.end().is_some_and(|e| date < e));
                }
                // Other-month days are hidden in range calendars.
                let placeholders = calendar
                    .day_cells()
                    .iter()
                    .filter(|c| !c.belongs_to_displayed_month())
                    .all(|c| c.is_placeholder() && !c.is_highlighted());
                prop_assert!(placeholders);
            }
        }
    }

    #[test]
    fn rebuild_without_changes_keeps_markup(
        anchor in arb_anchor(),
        day in 1u32..=28,
        monday in any::<bool>(),
        hide_other in any::<bool>(),
        hide_inputs in any::<bool>(),
    ) {
        let page = Page::new();
        let selected = CalendarDate::from_ymd(anchor.year(), anchor.month(), day).unwrap();
        let week_start = if monday { WeekStart::Monday } else { WeekStart::Sunday };
        let calendar = Calendar::new(
            &page,
            CalendarOptions::new("body")
                .with_selected_date(selected)
                .with_week_start(week_start)
                .with_hide_other_month_days(hide_other)
                .with_hide_inputs(hide_inputs)
                .with_clock(FixedClock(anchor)),
        )
        .unwrap();
        let host = calendar.handles().host;
        let before = page.document().outer_html(host);

        calendar.rebuild(true, None);
        prop_assert_eq!(page.document().outer_html(host), before.clone());

        calendar.navigate(kpio_datepicker::Direction::Next, None);
        calendar.navigate(kpio_datepicker::Direction::Prev, None);
        prop_assert_eq!(page.document().outer_html(host), before);
        prop_assert_eq!(calendar.selected_date(), Some(selected));
    }
}
