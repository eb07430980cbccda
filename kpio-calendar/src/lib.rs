//! KPIO Calendar - date picker engine
//!
//! Pure calendar computations shared by the KPIO date picker widgets:
//! dates and displayed months, pattern based formatting and parsing,
//! locale tables, month grid layout and selection state.
//! Nothing here touches the DOM.

#![no_std]

extern crate alloc;

pub mod clock;
pub mod date;
pub mod format;
pub mod grid;
pub mod locale;
pub mod selection;

pub use clock::{Clock, FixedClock};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use date::{CalendarDate, DateError, DisplayedMonth, WeekStart};
pub use format::{DateFormatter, Field, ParseError, DEFAULT_PATTERN};
pub use grid::{compute_grid, CellContext, CellFlags, CellMonth, DayCell, GridSlot, MonthGrid};
pub use locale::LocaleTable;
pub use selection::SelectionState;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{CalendarDate, DisplayedMonth, WeekStart};
    pub use crate::{CellContext, DayCell, MonthGrid, SelectionState};
    pub use crate::{DateFormatter, LocaleTable};
}
