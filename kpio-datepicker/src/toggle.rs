//! Calendar toggle
//!
//! A read-only text field with a calendar popup. Focusing or clicking the
//! field opens the popup, a click anywhere outside the toggle closes it, and
//! choosing a date writes it into the field and closes the popup.
//!
//! ```text
//! div.datepicker
//! ├── style
//! └── div.datepicker__toggle[.dark]
//!     ├── div.datepicker__toggle_input
//!     │   └── input[readonly]
//!     └── div.datepicker__toggle_calendar[.active]
//!         └── (calendar)
//! ```

use std::cell::{Cell, OnceCell};
use std::rc::{Rc, Weak};

use kpio_dom::{Event, EventType, ListenerOptions, NodeId};

use crate::calendar::Calendar;
use crate::config::{InitialDate, ToggleOptions};
use crate::error::PickerError;
use crate::page::Page;
use crate::shell::{self, DARK_CLASS, HOST_CLASS};
use crate::theme;

pub const TOGGLE_CLASS: &str = "datepicker__toggle";
pub const TOGGLE_INPUT_CLASS: &str = "datepicker__toggle_input";
pub const TOGGLE_CALENDAR_CLASS: &str = "datepicker__toggle_calendar";
pub const OPEN_CLASS: &str = "active";

struct ToggleInner {
    page: Page,
    host: NodeId,
    wrapper: NodeId,
    input: NodeId,
    popup: NodeId,
    calendar: OnceCell<Calendar>,
    open: Cell<bool>,
}

/// Text field with a calendar popup.
#[derive(Clone)]
pub struct CalendarToggle {
    inner: Rc<ToggleInner>,
}

impl CalendarToggle {
    /// Build a toggle and mount it.
    pub fn new(page: &Page, options: ToggleOptions) -> Result<CalendarToggle, PickerError> {
        let parent = shell::resolve(&page.document(), &options.element)
            .map_err(|e| e.logged("Toggle"))?;
        let formatter = options.formatter();
        let initial = match &options.selected_date {
            Some(date) => date.resolve(&formatter).map_err(|e| e.logged("Toggle"))?,
            None => options.clock.today(),
        };
        let dark = options.dark_mode || (options.dark_mode_auto && page.prefers_dark());

        let (host, wrapper, input, popup) = {
            let mut doc = page.document_mut();
            let host = doc.create_element("div");
            doc.add_class(host, HOST_CLASS);

            let style = doc.create_element("style");
            doc.append_text(style, &theme::toggle_stylesheet(options.theme));
            doc.append_child(host, style);

            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, TOGGLE_CLASS);
            if dark {
                doc.add_class(wrapper, DARK_CLASS);
            }
            doc.append_child(host, wrapper);

            let field = doc.create_element("div");
            doc.add_class(field, TOGGLE_INPUT_CLASS);
            doc.append_child(wrapper, field);

            let input = doc.create_element("input");
            doc.set_attribute(input, "type", "text");
            doc.set_attribute(input, "readonly", "");
            doc.set_attribute(input, "id", &format!("datepicker-toggle-{}", host));
            doc.set_attribute(input, "placeholder", &options.input_placeholder);
            doc.set_value(input, &formatter.format(initial));
            doc.append_child(field, input);

            let popup = doc.create_element("div");
            doc.add_class(popup, TOGGLE_CALENDAR_CLASS);
            doc.append_child(wrapper, popup);

            // The calendar mounts into the popup, so it must be attached.
            doc.append_child(parent, host);
            (host, wrapper, input, popup)
        };

        let inner = Rc::new(ToggleInner {
            page: page.clone(),
            host,
            wrapper,
            input,
            popup,
            calendar: OnceCell::new(),
            open: Cell::new(false),
        });

        let mut calendar_options = options.clone();
        calendar_options.element = popup.into();
        calendar_options.selected_date = Some(InitialDate::Date(initial));
        calendar_options.hide_inputs = true;
        calendar_options.on_render = None;
        let weak = Rc::downgrade(&inner);
        let forward = options.on_change.clone();
        calendar_options.on_change = Some(Rc::new(move |value: &str| {
            if let Some(inner) = weak.upgrade() {
                inner.page.document_mut().set_value(inner.input, value);
                inner.set_open(false);
            }
            if let Some(forward) = &forward {
                forward(value);
            }
        }));

        let calendar = match Calendar::new(page, calendar_options) {
            Ok(calendar) => calendar,
            Err(err) => {
                page.release(host);
                return Err(err.logged("Toggle"));
            }
        };
        let _ = inner.calendar.set(calendar.clone());

        ToggleInner::listen(&inner);
        if options.dark_mode_auto {
            let weak = Rc::downgrade(&inner);
            page.on_color_scheme_change(Rc::new(move |dark| {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .page
                        .document_mut()
                        .toggle_class(inner.wrapper, DARK_CLASS, Some(dark));
                }
            }));
        }

        log::debug!("[KPIO Toggle] mounted at node {} with {}", parent, initial);

        if let Some(callback) = &options.on_render {
            callback(&calendar);
        }
        Ok(CalendarToggle { inner })
    }

    pub fn open(&self) {
        self.inner.set_open(true);
    }

    pub fn close(&self) {
        self.inner.set_open(false);
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Text currently shown in the field.
    pub fn value(&self) -> String {
        self.inner
            .page
            .document()
            .value(self.inner.input)
            .map(String::from)
            .unwrap_or_default()
    }

    /// The calendar inside the popup.
    pub fn calendar(&self) -> Option<&Calendar> {
        self.inner.calendar.get()
    }

    pub fn input(&self) -> NodeId {
        self.inner.input
    }

    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    pub fn popup(&self) -> NodeId {
        self.inner.popup
    }
}

impl ToggleInner {
    fn listen(this: &Rc<ToggleInner>) {
        for event_type in [EventType::Focus, EventType::Click] {
            let weak = Rc::downgrade(this);
            this.page.add_event_listener(
                this.input,
                event_type,
                Rc::new(move |_event: &mut Event| {
                    if let Some(inner) = weak.upgrade() {
                        inner.set_open(true);
                    }
                }),
                ListenerOptions::default(),
            );
        }

        let root = this.page.document().root();
        let weak: Weak<ToggleInner> = Rc::downgrade(this);
        this.page.add_event_listener(
            root,
            EventType::Click,
            Rc::new(move |event: &mut Event| {
                if let Some(inner) = weak.upgrade() {
                    if inner.open.get() && !event.path_contains(inner.wrapper) {
                        inner.set_open(false);
                    }
                }
            }),
            ListenerOptions::default(),
        );
    }

    /// Idempotent: only a real change touches the DOM.
    fn set_open(&self, open: bool) {
        if self.open.replace(open) == open {
            return;
        }
        log::trace!("[KPIO Toggle] {}", if open { "open" } else { "close" });
        self.page
            .document_mut()
            .toggle_class(self.popup, OPEN_CLASS, Some(open));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpio_calendar::{CalendarDate, FixedClock};

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_value_defaults_to_today() {
        let page = Page::new();
        let toggle = CalendarToggle::new(
            &page,
            ToggleOptions::new("body").with_clock(FixedClock(date(2024, 5, 9))),
        )
        .unwrap();
        assert_eq!(toggle.value(), "2024-05-09");
        assert!(!toggle.is_open());
        let calendar = toggle.calendar().unwrap();
        assert!(calendar.date_input().is_none());
        assert_eq!(page.document().parent(calendar.handles().host), Some(toggle.popup()));
        assert!(page.document().has_attribute(toggle.input(), "readonly"));
    }

    #[test]
    fn test_focus_opens_outside_click_closes() {
        let page = Page::new();
        let outside = page.append_element(page.body(), "button");
        let toggle = CalendarToggle::new(
            &page,
            ToggleOptions::new("body").with_selected_date(date(2024, 2, 10)),
        )
        .unwrap();

        page.focus(toggle.input());
        assert!(toggle.is_open());
        assert!(page.document().has_class(toggle.popup(), OPEN_CLASS));

        // Navigating inside the popup keeps it open even though the button
        // is gone after the rebuild.
        let next = toggle.calendar().unwrap().next_button().unwrap();
        page.click(next);
        assert!(toggle.is_open());

        page.click(outside);
        assert!(!toggle.is_open());
        assert!(!page.document().has_class(toggle.popup(), OPEN_CLASS));
    }

    #[test]
    fn test_choosing_a_day_fills_field_and_closes() {
        let page = Page::new();
        let changes = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = changes.clone();
        let toggle = CalendarToggle::new(
            &page,
            ToggleOptions::new("body")
                .with_selected_date(date(2024, 2, 10))
                .with_format("DD/MM/YYYY")
                .on_change(move |v| sink.borrow_mut().push(v.to_string())),
        )
        .unwrap();
        assert_eq!(toggle.value(), "10/02/2024");

        page.click(toggle.input());
        assert!(toggle.is_open());
        let day = toggle.calendar().unwrap().day_button(21).unwrap();
        page.click(day);

        assert_eq!(toggle.value(), "21/02/2024");
        assert!(!toggle.is_open());
        assert_eq!(*changes.borrow(), vec![String::from("21/02/2024")]);
    }

    #[test]
    fn test_mount_failure_leaves_dom_untouched() {
        let page = Page::new();
        let before = page.document().outer_html(page.body());
        let err = CalendarToggle::new(&page, ToggleOptions::new("#nowhere"));
        assert!(matches!(err, Err(PickerError::MountTargetNotFound { .. })));
        let err = CalendarToggle::new(
            &page,
            ToggleOptions::new("body").with_selected_date("2024-13-01"),
        );
        assert!(matches!(err, Err(PickerError::InvalidInitialDate { .. })));
        assert_eq!(page.document().outer_html(page.body()), before);
    }
}
