//! KPIO Date Picker - calendar widgets on the KPIO DOM
//!
//! Three widgets built on [`kpio_calendar`] and [`kpio_dom`]:
//! - [`Calendar`]: a single calendar with header navigation, keyboard grid
//!   navigation and a text input
//! - [`CalendarToggle`]: a read-only field opening a calendar popup
//! - [`RangePicker`]: two calendars sharing one [`CalendarConnector`], with
//!   optional predefined ranges
//!
//! All widgets live on a [`Page`], which owns the document and event
//! dispatcher and drives events synchronously on the calling thread.

pub mod calendar;
pub mod config;
pub mod connector;
pub mod error;
pub mod page;
pub mod range;
pub mod shell;
pub mod theme;
pub mod toggle;

pub use calendar::{Calendar, Direction, ErrorEntry, ErrorKind, FocusEdge};
pub use config::{
    CalendarOptions, InitialDate, NavEvent, PickerConfig, PredefinedRange, RangeChange,
    RangeOptions, ToggleOptions,
};
pub use connector::{CalendarConnector, LinkedCalendar};
pub use error::PickerError;
pub use page::Page;
pub use range::RangePicker;
pub use shell::{MountTarget, ShellHandles};
pub use theme::Theme;
pub use toggle::CalendarToggle;

pub use kpio_calendar::{CalendarDate, DisplayedMonth, SelectionState, WeekStart};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Calendar, CalendarConnector, CalendarToggle, RangePicker};
    pub use crate::{CalendarOptions, PredefinedRange, RangeOptions, ToggleOptions};
    pub use crate::{CalendarDate, DisplayedMonth, Page, PickerError, Theme};
}
