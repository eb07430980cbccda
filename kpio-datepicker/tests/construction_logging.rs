//! Construction logging
//!
//! Every widget constructor that refuses to build reports the reason at
//! `error` level under its component prefix before returning.

use std::sync::{Mutex, Once};

use kpio_datepicker::prelude::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

fn install() {
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Whether an `error` record carries every fragment.
fn logged_error(fragments: &[&str]) -> bool {
    CAPTURE
        .records
        .lock()
        .unwrap()
        .iter()
        .any(|(level, msg)| *level == Level::Error && fragments.iter().all(|f| msg.contains(f)))
}

fn page_with_app() -> Page {
    let page = Page::new();
    let app = page.append_element(page.body(), "div");
    page.document_mut().set_attribute(app, "id", "app");
    page
}

#[test]
fn calendar_logs_missing_mount_target() {
    install();
    let page = page_with_app();
    let result = Calendar::new(&page, CalendarOptions::new("#missing-calendar"));
    assert!(matches!(result, Err(PickerError::MountTargetNotFound { .. })));
    assert!(logged_error(&["[KPIO Calendar]", "#missing-calendar"]));
}

#[test]
fn calendar_logs_bad_initial_date() {
    install();
    let page = page_with_app();
    let result = Calendar::new(&page, CalendarOptions::new("#app").with_selected_date("31/02/nope"));
    assert!(matches!(result, Err(PickerError::InvalidInitialDate { .. })));
    assert!(logged_error(&["[KPIO Calendar]", "31/02/nope"]));
}

#[test]
fn toggle_logs_missing_mount_target() {
    install();
    let page = page_with_app();
    let result = CalendarToggle::new(&page, ToggleOptions::new("#missing-toggle"));
    assert!(matches!(result, Err(PickerError::MountTargetNotFound { .. })));
    assert!(logged_error(&["[KPIO Toggle]", "#missing-toggle"]));
}

#[test]
fn range_logs_missing_mount_target() {
    install();
    let page = page_with_app();
    let result = RangePicker::new(&page, RangeOptions::new("#missing-range"));
    assert!(matches!(result, Err(PickerError::MountTargetNotFound { .. })));
    assert!(logged_error(&["[KPIO Range]", "#missing-range"]));
}

#[test]
fn range_logs_bad_initial_date() {
    install();
    let page = page_with_app();
    let result = RangePicker::new(&page, RangeOptions::new("#app").with_selected_date("2024-13-45"));
    assert!(matches!(result, Err(PickerError::InvalidInitialDate { .. })));
    assert!(logged_error(&["[KPIO Range]", "2024-13-45"]));
}
