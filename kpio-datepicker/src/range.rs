//! Range picker
//!
//! Two range-mode calendars sharing one [`CalendarConnector`], shown one
//! month apart, with an optional sidebar of predefined ranges.
//!
//! ```text
//! div.datepicker
//! ├── style
//! └── div.datepicker__range[.dark]
//!     ├── div.datepicker__range_predefined   (only with predefined ranges)
//!     │   └── button × N
//!     ├── div.datepicker__range_calendar     (left calendar)
//!     └── div.datepicker__range_calendar     (right calendar)
//! ```
//!
//! The left calendar only navigates backward and the right one only
//! forward; whichever moves, the other shifts by the same month so the gap
//! between them is kept. The gap only collapses to a single month when the
//! shift would put the left calendar at or after the right one.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use kpio_calendar::{CalendarDate, Clock, DateFormatter, DisplayedMonth, SelectionState};
use kpio_dom::{Event, EventType, ListenerOptions, NodeId};

use crate::calendar::{Calendar, Direction};
use crate::config::{
    CalendarOptions, InitialDate, NavCallback, NavEvent, PredefinedRange, RangeChange, RangeOptions,
};
use crate::connector::CalendarConnector;
use crate::error::PickerError;
use crate::page::Page;
use crate::shell::{self, DARK_CLASS, HOST_CLASS};
use crate::theme;

pub const RANGE_CLASS: &str = "datepicker__range";
pub const PREDEFINED_CLASS: &str = "datepicker__range_predefined";
pub const RANGE_CALENDAR_CLASS: &str = "datepicker__range_calendar";

struct RangeInner {
    page: Page,
    host: NodeId,
    wrapper: NodeId,
    connector: CalendarConnector,
    formatter: DateFormatter,
    clock: Rc<dyn Clock>,
    predefined: Vec<PredefinedRange>,
    /// Sidebar button per predefined range, same order.
    predefined_buttons: Vec<NodeId>,
    left: OnceCell<Calendar>,
    right: OnceCell<Calendar>,
}

/// Two linked calendars selecting one date range.
#[derive(Clone)]
pub struct RangePicker {
    inner: Rc<RangeInner>,
    left: Calendar,
    right: Calendar,
}

/// Format a range for the change callback.
pub fn range_change(formatter: &DateFormatter, selection: &SelectionState) -> RangeChange {
    RangeChange {
        start_date: selection.start().map(|d| formatter.format(d)),
        end_date: selection.end().map(|d| formatter.format(d)),
    }
}

/// Months to show for a range: its start month on the left; its end month
/// on the right, or the month after the start when both fall in one month.
pub fn months_for_range(start: CalendarDate, end: CalendarDate) -> (DisplayedMonth, DisplayedMonth) {
    let left = DisplayedMonth::of(start);
    let end_month = DisplayedMonth::of(end);
    let right = if end_month > left { end_month } else { left.next() };
    (left, right)
}

impl RangePicker {
    /// Build a range picker and mount it.
    pub fn new(page: &Page, options: RangeOptions) -> Result<RangePicker, PickerError> {
        let parent = shell::resolve(&page.document(), &options.element)
            .map_err(|e| e.logged("Range"))?;
        let formatter = options.formatter();
        let anchor = match &options.selected_date {
            Some(date) => date.resolve(&formatter).map_err(|e| e.logged("Range"))?,
            None => options.clock.today(),
        };
        let left_month = DisplayedMonth::of(anchor);
        let right_month = left_month.next();
        let dark = options.dark_mode || (options.dark_mode_auto && page.prefers_dark());

        let (host, wrapper, predefined_buttons, left_wrap, right_wrap) = {
            let mut doc = page.document_mut();
            let host = doc.create_element("div");
            doc.add_class(host, HOST_CLASS);

            let style = doc.create_element("style");
            doc.append_text(style, &theme::range_stylesheet());
            doc.append_child(host, style);

            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, RANGE_CLASS);
            if dark {
                doc.add_class(wrapper, DARK_CLASS);
            }
            doc.append_child(host, wrapper);

            let mut buttons = Vec::with_capacity(options.predefined_ranges.len());
            if !options.predefined_ranges.is_empty() {
                let sidebar = doc.create_element("div");
                doc.add_class(sidebar, PREDEFINED_CLASS);
                doc.append_child(wrapper, sidebar);
                for range in &options.predefined_ranges {
                    let button = doc.create_element("button");
                    doc.set_attribute(button, "type", "button");
                    doc.append_text(button, &range.label);
                    doc.append_child(sidebar, button);
                    buttons.push(button);
                }
            }

            let mut calendar_wrap = || {
                let wrap = doc.create_element("div");
                doc.add_class(wrap, RANGE_CALENDAR_CLASS);
                doc.append_child(wrapper, wrap);
                wrap
            };
            let left_wrap = calendar_wrap();
            let right_wrap = calendar_wrap();

            // Calendars mount into the wraps, so the host goes in first.
            doc.append_child(parent, host);
            (host, wrapper, buttons, left_wrap, right_wrap)
        };

        let connector = CalendarConnector::new();
        let inner = Rc::new(RangeInner {
            page: page.clone(),
            host,
            wrapper,
            connector: connector.clone(),
            formatter: formatter.clone(),
            clock: options.clock.clone(),
            predefined: options.predefined_ranges.clone(),
            predefined_buttons,
            left: OnceCell::new(),
            right: OnceCell::new(),
        });

        let on_change = options.on_change.clone();
        let change_formatter = formatter.clone();
        connector.set_date_changed_callback(Rc::new(move |selection: &SelectionState| {
            let change = range_change(&change_formatter, selection);
            log::debug!(
                "[KPIO Range] range changed: {:?} - {:?}",
                change.start_date,
                change.end_date
            );
            if let Some(callback) = &on_change {
                callback(&change);
            }
        }));

        let weak = Rc::downgrade(&inner);
        let base = CalendarOptions {
            format: options.format.clone(),
            locale: options.locale.clone(),
            week_start: options.week_start,
            theme: options.theme,
            styles: options.styles.clone(),
            dark_mode: options.dark_mode,
            dark_mode_auto: options.dark_mode_auto,
            icon_prev: options.icon_prev.clone(),
            icon_next: options.icon_next.clone(),
            clock: options.clock.clone(),
            ..CalendarOptions::default()
        }
        .with_hide_inputs(true)
        .with_hide_other_month_days(true)
        .with_range_mode(Some(connector.clone()));

        let mut left_options = base.clone();
        left_options.element = left_wrap.into();
        left_options.selected_date = Some(InitialDate::Date(left_month.first_day()));
        left_options.hide_next_nav = true;
        left_options.on_prev_nav = Some(follow(weak.clone(), Side::Left, Direction::Prev));
        left_options.on_next_nav = Some(follow(weak.clone(), Side::Left, Direction::Next));

        let mut right_options = base;
        right_options.element = right_wrap.into();
        right_options.selected_date = Some(InitialDate::Date(right_month.first_day()));
        right_options.hide_prev_nav = true;
        right_options.on_prev_nav = Some(follow(weak.clone(), Side::Right, Direction::Prev));
        right_options.on_next_nav = Some(follow(weak, Side::Right, Direction::Next));

        let calendars = Calendar::new(page, left_options)
            .and_then(|left| Calendar::new(page, right_options).map(|right| (left, right)));
        let (left, right) = match calendars {
            Ok(pair) => pair,
            Err(err) => {
                page.release(host);
                return Err(err.logged("Range"));
            }
        };
        let _ = inner.left.set(left.clone());
        let _ = inner.right.set(right.clone());

        RangeInner::listen(&inner);
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

        log::debug!(
            "[KPIO Range] mounted at node {} showing {} and {} with {} predefined ranges",
            parent,
            left_month,
            right_month,
            inner.predefined.len()
        );

        let picker = RangePicker { inner, left, right };
        if let Some(callback) = &options.on_render {
            callback(&picker);
        }
        Ok(picker)
    }

    /// Apply predefined range `index`: show its months, then set the
    /// connector's range directly. Inverted producers are swapped.
    pub fn activate_predefined(&self, index: usize) -> Result<(), PickerError> {
        self.inner.activate_predefined(index)
    }

    /// Show today's month on the left and the next one on the right, then
    /// feed today into the range like a click.
    pub fn jump_to_today(&self) {
        let today = self.inner.clock.today();
        let month = DisplayedMonth::of(today);
        log::debug!("[KPIO Range] jump to today {}", today);
        self.left.show_month(month);
        self.right.show_month(month.next());
        self.inner.connector.register_click(today);
    }

    pub fn left(&self) -> &Calendar {
        &self.left
    }

    pub fn right(&self) -> &Calendar {
        &self.right
    }

    pub fn connector(&self) -> &CalendarConnector {
        &self.inner.connector
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.connector.selection()
    }

    /// Current range formatted like the change callback payload.
    pub fn value(&self) -> RangeChange {
        range_change(&self.inner.formatter, &self.selection())
    }

    /// Months shown by the left and right calendar.
    pub fn displayed_months(&self) -> (DisplayedMonth, DisplayedMonth) {
        (self.left().displayed_month(), self.right().displayed_month())
    }

    pub fn predefined_labels(&self) -> Vec<&str> {
        self.inner.predefined.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn predefined_button(&self, index: usize) -> Option<NodeId> {
        self.inner.predefined_buttons.get(index).copied()
    }

    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    pub fn wrapper(&self) -> NodeId {
        self.inner.wrapper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Nav callback that shifts the other calendar by the same month.
fn follow(range: Weak<RangeInner>, side: Side, direction: Direction) -> NavCallback {
    Rc::new(move |nav: &NavEvent| {
        let range = match range.upgrade() {
            Some(range) => range,
            None => return,
        };
        let other = match side {
            Side::Left => range.right.get(),
            Side::Right => range.left.get(),
        };
        let other = match other {
            Some(other) => other,
            None => return,
        };
        let current = other.displayed_month();
        let shifted = current.shifted(direction.delta()).unwrap_or(current);
        let month = match side {
            Side::Left if shifted <= nav.displayed_month => nav.displayed_month.next(),
            Side::Right if shifted >= nav.displayed_month => nav.displayed_month.prev(),
            _ => shifted,
        };
        if month != current {
            other.set_displayed_month(month);
        }
    })
}

impl RangeInner {
    fn listen(this: &Rc<RangeInner>) {
        let sidebar = match this.predefined_buttons.first() {
            Some(&button) => this.page.document().parent(button),
            None => None,
        };
        let sidebar = match sidebar {
            Some(sidebar) => sidebar,
            None => return,
        };
        let weak = Rc::downgrade(this);
        this.page.add_event_listener(
            sidebar,
            EventType::Click,
            Rc::new(move |event: &mut Event| {
                let inner = match weak.upgrade() {
                    Some(inner) => inner,
                    None => return,
                };
                let index = inner
                    .predefined_buttons
                    .iter()
                    .position(|&b| event.path_contains(b));
                if let Some(index) = index {
                    if let Err(e) = inner.activate_predefined(index) {
                        log::error!("[KPIO Range] {}", e);
                    }
                }
            }),
            ListenerOptions::default(),
        );
    }

    fn activate_predefined(&self, index: usize) -> Result<(), PickerError> {
        let range = self
            .predefined
            .get(index)
            .ok_or(PickerError::UnknownPredefinedRange { index })?;
        let (mut start, mut end) = (range.get_range)();
        if start > end {
            core::mem::swap(&mut start, &mut end);
        }
        let (left_month, right_month) = months_for_range(start, end);
        log::debug!(
            "[KPIO Range] predefined {:?}: {} - {}",
            range.label,
            start,
            end
        );

        if let (Some(left), Some(right)) = (self.left.get(), self.right.get()) {
            left.show_month(left_month);
            right.show_month(right_month);
        }
        self.connector.set_range(Some(start), Some(end));
        Ok(())
    }
}
