//! Range connector
//!
//! Mediator shared by every calendar taking part in one range selection. It
//! owns the range and, after each change, rebuilds all linked calendars and
//! then reports the change. Calendars are held weakly: the connector never
//! keeps a widget alive.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use kpio_calendar::{CalendarDate, SelectionState};

/// A calendar that redraws itself when the shared range changes.
pub trait LinkedCalendar {
    fn rebuild_linked(&self);
}

/// Called after a range change has been rebuilt everywhere.
pub type DateChangedCallback = Rc<dyn Fn(&SelectionState)>;

struct ConnectorInner {
    selection: RefCell<SelectionState>,
    linked: RefCell<Vec<Weak<dyn LinkedCalendar>>>,
    date_changed: RefCell<Option<DateChangedCallback>>,
    broadcasting: Cell<bool>,
}

/// Shared range coordinator.
#[derive(Clone)]
pub struct CalendarConnector {
    inner: Rc<ConnectorInner>,
}

impl CalendarConnector {
    /// Connector with an empty range.
    pub fn new() -> Self {
        CalendarConnector {
            inner: Rc::new(ConnectorInner {
                selection: RefCell::new(SelectionState::empty_range()),
                linked: RefCell::new(Vec::new()),
                date_changed: RefCell::new(None),
                broadcasting: Cell::new(false),
            }),
        }
    }

    pub fn selection(&self) -> SelectionState {
        *self.inner.selection.borrow()
    }

    pub fn start(&self) -> Option<CalendarDate> {
        self.inner.selection.borrow().start()
    }

    pub fn end(&self) -> Option<CalendarDate> {
        self.inner.selection.borrow().end()
    }

    /// Whether two handles share one connector.
    pub fn same_as(&self, other: &CalendarConnector) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn set_date_changed_callback(&self, callback: DateChangedCallback) {
        *self.inner.date_changed.borrow_mut() = Some(callback);
    }

    /// Link a calendar for rebuild broadcasts.
    pub fn subscribe(&self, calendar: Weak<dyn LinkedCalendar>) {
        self.inner.linked.borrow_mut().push(calendar);
    }

    /// Number of linked calendars still alive.
    pub fn linked_count(&self) -> usize {
        self.inner
            .linked
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Feed a clicked date into the range.
    ///
    /// The new state is stored first, then every linked calendar rebuilds,
    /// then the date-changed callback runs.
    pub fn register_click(&self, date: CalendarDate) -> SelectionState {
        let next = self.selection().register_click(date);
        log::debug!(
            "[KPIO Connector] click {} -> start {:?} end {:?}",
            date,
            next.start(),
            next.end()
        );
        self.commit(next);
        next
    }

    /// Replace the range directly. Inverted pairs are swapped.
    pub fn set_range(&self, start: Option<CalendarDate>, end: Option<CalendarDate>) {
        self.commit(SelectionState::range(start, end));
    }

    /// Empty the range.
    pub fn clear(&self) {
        self.commit(SelectionState::empty_range());
    }

    /// Store `next` without rebuilding or notifying.
    pub(crate) fn store(&self, next: SelectionState) {
        *self.inner.selection.borrow_mut() = next;
    }

    fn commit(&self, next: SelectionState) {
        self.store(next);
        self.rebuild_all_linked();
        self.notify();
    }

    /// Rebuild every linked calendar once.
    ///
    /// A rebuild requested while a broadcast is running is dropped: the
    /// running broadcast already covers every calendar.
    pub fn rebuild_all_linked(&self) {
        if self.inner.broadcasting.replace(true) {
            log::trace!("[KPIO Connector] nested broadcast ignored");
            return;
        }

        let calendars: Vec<Rc<dyn LinkedCalendar>> = {
            let mut linked = self.inner.linked.borrow_mut();
            linked.retain(|w| w.strong_count() > 0);
            linked.iter().filter_map(Weak::upgrade).collect()
        };
        log::trace!("[KPIO Connector] rebuilding {} calendars", calendars.len());
        for calendar in calendars {
            calendar.rebuild_linked();
        }

        self.inner.broadcasting.set(false);
    }

    fn notify(&self) {
        let callback = self.inner.date_changed.borrow().clone();
        if let Some(callback) = callback {
            let selection = self.selection();
            callback(&selection);
        }
    }
}

impl Default for CalendarConnector {
    fn default() -> Self {
        Self::new()
    }
}
