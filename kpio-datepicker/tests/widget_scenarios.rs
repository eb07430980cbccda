//! Widget scenarios
//!
//! End-to-end behaviour of the calendar, toggle and range picker driven
//! through page events, the way a user would.

use std::cell::RefCell;
use std::rc::Rc;

use kpio_calendar::{CalendarDate, DisplayedMonth, FixedClock, SelectionState, WeekStart};
use kpio_datepicker::calendar::{Direction, ErrorKind, FocusEdge};
use kpio_datepicker::prelude::*;
use kpio_datepicker::{MountTarget, PickerConfig, RangeChange};

fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> DisplayedMonth {
    DisplayedMonth::of(date(y, m, 1))
}

/// Page with an empty `<div id="app">`.
fn page_with_app() -> Page {
    let page = Page::new();
    let app = page.append_element(page.body(), "div");
    page.document_mut().set_attribute(app, "id", "app");
    page
}

fn single(selected: CalendarDate) -> CalendarOptions {
    CalendarOptions::new("#app")
        .with_selected_date(selected)
        .with_clock(FixedClock(date(2024, 1, 20)))
}

// ── Calendar ─────────────────────────────────────────────────────────

#[test]
fn navigate_next_keeps_selection() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 1, 15))).unwrap();

    calendar.navigate(Direction::Next, None);

    assert_eq!(calendar.displayed_month(), month(2024, 2));
    assert_eq!(calendar.selected_date(), Some(date(2024, 1, 15)));
    assert!(calendar.day_cells().iter().all(|c| !c.is_active()));
}

#[test]
fn invalid_text_input_is_reported_not_committed() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = changes.clone();
    let calendar = Calendar::new(
        &page,
        single(date(2024, 1, 15)).on_change(move |v| sink.borrow_mut().push(v.into())),
    )
    .unwrap();

    calendar.handle_text_input_commit("invalid-date");

    let errors = calendar.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InputError);
    assert_eq!(errors[0].message, "The entered date is invalid");
    assert_eq!(calendar.selected_date(), Some(date(2024, 1, 15)));
    assert!(changes.borrow().is_empty());
}

#[test]
fn typed_date_commits_without_rebuilding_inputs() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = changes.clone();
    let calendar = Calendar::new(
        &page,
        single(date(2024, 1, 15)).on_change(move |v| sink.borrow_mut().push(v.into())),
    )
    .unwrap();
    let input = calendar.date_input().unwrap();
    page.focus(input);

    page.type_text(input, "2025-07-04");

    assert_eq!(calendar.selected_date(), Some(date(2025, 7, 4)));
    assert_eq!(calendar.displayed_month(), month(2025, 7));
    assert_eq!(*changes.borrow(), vec![String::from("2025-07-04")]);
    assert_eq!(calendar.date_input(), Some(input));
    assert_eq!(page.focused(), Some(input));
}

#[test]
fn arrow_right_on_last_day_crosses_month() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 1, 15))).unwrap();
    let last = calendar.day_button(31).unwrap();
    page.focus(last);

    let consumed = !page.key_down(last, "ArrowRight");

    assert!(consumed);
    assert_eq!(calendar.displayed_month(), month(2024, 2));
    assert_eq!(page.focused(), calendar.day_button(1));
}

#[test]
fn arrow_down_in_last_week_crosses_month() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 1, 15))).unwrap();
    assert!(calendar.handle_keyboard_navigation("ArrowDown", 27));
    assert_eq!(calendar.displayed_month(), month(2024, 2));
    assert_eq!(page.focused(), calendar.day_button(1));

    assert!(calendar.handle_keyboard_navigation("ArrowUp", 3));
    assert_eq!(calendar.displayed_month(), month(2024, 1));
    assert_eq!(page.focused(), calendar.day_button(31));
}

#[test]
fn enter_and_space_select_the_focused_day() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 1, 15))).unwrap();
    let b9 = calendar.day_button(9).unwrap();
    page.focus(b9);
    page.key_down(b9, "Enter");
    assert_eq!(calendar.selected_date(), Some(date(2024, 1, 9)));

    let b10 = calendar.day_button(10).unwrap();
    page.key_down(b10, " ");
    assert_eq!(calendar.selected_date(), Some(date(2024, 1, 10)));
}

#[test]
fn focus_edge_on_rebuild() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 2, 15))).unwrap();
    calendar.rebuild(false, Some(FocusEdge::Last));
    assert_eq!(page.focused(), calendar.day_button(29));
    calendar.rebuild(false, Some(FocusEdge::First));
    assert_eq!(page.focused(), calendar.day_button(1));
}

#[test]
fn rebuild_is_idempotent() {
    let page = page_with_app();
    let calendar = Calendar::new(&page, single(date(2024, 1, 15))).unwrap();
    let host = calendar.handles().host;

    let first = page.document().outer_html(host);
    calendar.rebuild(true, None);
    let second = page.document().outer_html(host);
    calendar.rebuild(true, None);
    let third = page.document().outer_html(host);

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn set_date_str_reports_parse_failures() {
    let page = page_with_app();
    let calendar = Calendar::new(
        &page,
        single(date(2024, 1, 15)).with_format("DD.MM.YYYY"),
    )
    .unwrap();

    assert_eq!(calendar.set_date_str("29.02.2024"), Ok(date(2024, 2, 29)));
    assert_eq!(calendar.formatted_value().as_deref(), Some("29.02.2024"));
    assert!(calendar.set_date_str("30.02.2024").is_err());
    assert_eq!(calendar.errors().len(), 1);
    assert_eq!(calendar.selected_date(), Some(date(2024, 2, 29)));
}

#[test]
fn monday_week_start_and_locale() {
    let page = page_with_app();
    let calendar = Calendar::new(
        &page,
        single(date(2024, 9, 1))
            .with_week_start(WeekStart::Monday)
            .with_locale(kpio_calendar::LocaleTable::german()),
    )
    .unwrap();
    let doc = page.document();
    let handles = calendar.handles();
    assert_eq!(doc.text_content(handles.weekdays), "MoDiMiDoFrSaSo");
    assert!(doc.text_content(handles.header).contains("September 2024"));
    // 2024-09-01 is a Sunday: six leading days in a Monday-first grid.
    let first = calendar.day_cells().iter().position(|c| c.belongs_to_displayed_month());
    assert_eq!(first, Some(6));
}

#[test]
fn mount_failures_leave_the_document_untouched() {
    let page = page_with_app();
    let loose = page.document_mut().create_element("div");
    let before = page.document().outer_html(page.body());
    let nodes_before = page.document().len();

    let mut options = single(date(2024, 1, 1));
    options.element = MountTarget::Selector("#nowhere".into());
    assert!(matches!(
        Calendar::new(&page, options),
        Err(PickerError::MountTargetNotFound { ref selector }) if selector == "#nowhere"
    ));

    let mut options = single(date(2024, 1, 1));
    options.element = MountTarget::Node(loose);
    assert!(matches!(
        Calendar::new(&page, options),
        Err(PickerError::MountTargetMissing { node }) if node == loose
    ));

    assert!(matches!(
        Calendar::new(&page, single(date(2024, 1, 1)).with_selected_date("01/01/2024")),
        Err(PickerError::InvalidInitialDate { .. })
    ));
    assert!(matches!(
        RangePicker::new(&page, RangeOptions::new("#nowhere")),
        Err(PickerError::MountTargetNotFound { .. })
    ));

    assert_eq!(page.document().outer_html(page.body()), before);
    assert_eq!(page.document().len(), nodes_before);
}

#[test]
fn dark_mode_follows_the_page() {
    let page = page_with_app();
    page.set_prefers_dark(true);
    let calendar = Calendar::new(&page, single(date(2024, 1, 1)).with_dark_mode_auto(true)).unwrap();
    let root = calendar.handles().calendar;
    assert!(calendar.is_dark());
    assert!(page.document().has_class(root, "dark"));
    let css = page.document().text_content(calendar.handles().style);
    assert!(css.contains(".datepicker__calendar.dark"));

    page.set_prefers_dark(false);
    assert!(!calendar.is_dark());
    assert!(!page.document().has_class(root, "dark"));

    // A fixed calendar ignores the signal.
    let fixed = Calendar::new(&page, single(date(2024, 1, 1))).unwrap();
    page.set_prefers_dark(true);
    assert!(!fixed.is_dark());
    assert!(calendar.is_dark());
}

#[test]
fn config_file_drives_options() {
    let config = PickerConfig::from_toml_str(
        r#"
theme = "lite-purple"
locale = "fr"
week_start = "monday"
selected_date = "2024-05-17"
input_label = "Date de départ"
"#,
    )
    .unwrap();
    let page = page_with_app();
    let calendar = Calendar::new(
        &page,
        config.apply(CalendarOptions::new("#app").with_clock(FixedClock(date(2024, 1, 1)))),
    )
    .unwrap();

    assert_eq!(calendar.selected_date(), Some(date(2024, 5, 17)));
    let doc = page.document();
    assert!(doc.text_content(calendar.handles().header).contains("mai 2024"));
    assert!(doc.text_content(calendar.handles().inputs).starts_with("Date de départ"));
    assert!(doc.text_content(calendar.handles().style).contains("#7d56da"));
}

#[test]
fn connector_without_range_mode_is_ignored() {
    let page = page_with_app();
    let connector = CalendarConnector::new();
    let mut options = single(date(2024, 1, 15));
    options.connector = Some(connector.clone());
    let calendar = Calendar::new(&page, options).unwrap();

    assert!(calendar.connector().is_none());
    assert_eq!(connector.linked_count(), 0);
    calendar.handle_day_activate(3);
    assert_eq!(calendar.selected_date(), Some(date(2024, 1, 3)));
    assert_eq!(connector.selection(), SelectionState::empty_range());
}

// ── Range ────────────────────────────────────────────────────────────

fn range_options(changes: &Rc<RefCell<Vec<RangeChange>>>) -> RangeOptions {
    let sink = changes.clone();
    RangeOptions::new("#app")
        .with_selected_date(date(2024, 3, 1))
        .with_clock(FixedClock(date(2024, 3, 1)))
        .on_change(move |c| sink.borrow_mut().push(c.clone()))
}

#[test]
fn range_clicks_swap_inverted_pair() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(&page, range_options(&changes)).unwrap();

    page.click(picker.left().day_button(10).unwrap());
    page.click(picker.left().day_button(5).unwrap());

    let connector = picker.connector();
    assert_eq!(connector.start(), Some(date(2024, 3, 5)));
    assert_eq!(connector.end(), Some(date(2024, 3, 10)));
    assert_eq!(
        *changes.borrow(),
        vec![
            RangeChange {
                start_date: Some("2024-03-10".into()),
                end_date: None,
            },
            RangeChange {
                start_date: Some("2024-03-05".into()),
                end_date: Some("2024-03-10".into()),
            },
        ]
    );

    let cells = picker.left().day_cells();
    let highlighted: Vec<u32> = cells
        .iter()
        .filter(|c| c.is_highlighted())
        .map(|c| c.day_number)
        .collect();
    assert_eq!(highlighted, vec![6, 7, 8, 9]);
    assert_eq!(cells.iter().filter(|c| c.is_active()).count(), 2);
}

#[test]
fn range_spans_both_calendars() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(&page, range_options(&changes)).unwrap();

    page.click(picker.left().day_button(30).unwrap());
    page.click(picker.right().day_button(2).unwrap());

    assert_eq!(picker.selection().start(), Some(date(2024, 3, 30)));
    assert_eq!(picker.selection().end(), Some(date(2024, 4, 2)));
    // Both calendars were rebuilt against the shared range.
    let right: Vec<u32> = picker
        .right()
        .day_cells()
        .iter()
        .filter(|c| c.is_highlighted())
        .map(|c| c.day_number)
        .collect();
    assert_eq!(right, vec![1]);
    let left: Vec<u32> = picker
        .left()
        .day_cells()
        .iter()
        .filter(|c| c.is_highlighted())
        .map(|c| c.day_number)
        .collect();
    assert_eq!(left, vec![31]);
    assert_eq!(picker.displayed_months(), (month(2024, 3), month(2024, 4)));

    // Third click starts over.
    page.click(picker.right().day_button(9).unwrap());
    assert_eq!(picker.selection().start(), Some(date(2024, 4, 9)));
    assert_eq!(picker.selection().end(), None);
    assert_eq!(changes.borrow().len(), 3);
}

#[test]
fn predefined_range_positions_both_calendars() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(
        &page,
        range_options(&changes).with_predefined_range(PredefinedRange::fixed(
            "Winter",
            date(2024, 1, 1),
            date(2024, 2, 15),
        )),
    )
    .unwrap();

    page.click(picker.predefined_button(0).unwrap());

    assert_eq!(picker.displayed_months(), (month(2024, 1), month(2024, 2)));
    assert_eq!(picker.connector().start(), Some(date(2024, 1, 1)));
    assert_eq!(picker.connector().end(), Some(date(2024, 2, 15)));
    assert_eq!(
        changes.borrow().last(),
        Some(&RangeChange {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-02-15".into()),
        })
    );
    assert_eq!(picker.value(), changes.borrow()[0]);
}

#[test]
fn range_calendars_stay_one_month_apart() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(&page, range_options(&changes)).unwrap();

    page.click(picker.left().prev_button().unwrap());
    assert_eq!(picker.displayed_months(), (month(2024, 2), month(2024, 3)));

    page.click(picker.right().next_button().unwrap());
    page.click(picker.right().next_button().unwrap());
    assert_eq!(picker.displayed_months(), (month(2024, 4), month(2024, 5)));

    // Keyboard can still move the left calendar forward; the right follows.
    assert!(picker.left().handle_keyboard_navigation("ArrowRight", 30));
    assert_eq!(picker.displayed_months(), (month(2024, 5), month(2024, 6)));
    assert!(changes.borrow().is_empty());
}

#[test]
fn range_navigation_keeps_predefined_gap() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(
        &page,
        range_options(&changes).with_predefined_range(PredefinedRange::fixed(
            "Spring",
            date(2024, 1, 10),
            date(2024, 4, 20),
        )),
    )
    .unwrap();

    page.click(picker.predefined_button(0).unwrap());
    assert_eq!(picker.displayed_months(), (month(2024, 1), month(2024, 4)));

    page.click(picker.left().prev_button().unwrap());
    assert_eq!(picker.displayed_months(), (month(2023, 12), month(2024, 3)));

    page.click(picker.right().next_button().unwrap());
    page.click(picker.right().next_button().unwrap());
    assert_eq!(picker.displayed_months(), (month(2024, 1), month(2024, 5)));

    assert_eq!(picker.connector().start(), Some(date(2024, 1, 10)));
    assert_eq!(picker.connector().end(), Some(date(2024, 4, 20)));
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn range_jump_to_today_restores_adjacent_months() {
    let page = page_with_app();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let picker = RangePicker::new(&page, range_options(&changes)).unwrap();

    page.click(picker.left().prev_button().unwrap());
    page.click(picker.left().prev_button().unwrap());
    assert_eq!(picker.displayed_months(), (month(2024, 1), month(2024, 2)));

    picker.jump_to_today();

    assert_eq!(picker.displayed_months(), (month(2024, 3), month(2024, 4)));
    assert_eq!(picker.connector().start(), Some(date(2024, 3, 1)));
    assert_eq!(picker.connector().end(), None);
    assert_eq!(
        changes.borrow().last(),
        Some(&RangeChange {
            start_date: Some("2024-03-01".into()),
            end_date: None,
        })
    );
}

#[test]
fn range_on_render_fires_once() {
    let page = page_with_app();
    let renders = Rc::new(RefCell::new(0));
    let count = renders.clone();
    let picker = RangePicker::new(
        &page,
        RangeOptions::new("#app").on_render(move |p| {
            assert_eq!(p.connector().linked_count(), 2);
            *count.borrow_mut() += 1;
        }),
    )
    .unwrap();
    picker.left().navigate(Direction::Prev, None);
    assert_eq!(*renders.borrow(), 1);
}

// ── Toggle ───────────────────────────────────────────────────────────

#[test]
fn toggle_in_dark_auto_mode() {
    let page = page_with_app();
    let toggle = CalendarToggle::new(
        &page,
        ToggleOptions::new("#app")
            .with_selected_date(date(2024, 1, 15))
            .with_dark_mode_auto(true),
    )
    .unwrap();
    let wrapper = page.document().parent(toggle.popup()).unwrap();
    assert!(!page.document().has_class(wrapper, "dark"));

    page.set_prefers_dark(true);
    assert!(page.document().has_class(wrapper, "dark"));
    assert!(toggle.calendar().unwrap().is_dark());
}

#[test]
fn toggle_close_and_reopen() {
    let page = page_with_app();
    let toggle = CalendarToggle::new(&page, ToggleOptions::new("#app")).unwrap();
    toggle.open();
    toggle.open();
    assert!(toggle.is_open());
    // Clicking the popup itself keeps it open.
    page.click(toggle.calendar().unwrap().handles().days);
    assert!(toggle.is_open());
    page.click(page.body());
    assert!(!toggle.is_open());
}
