//! Selection state
//!
//! Either one selected date or a start/end range. Transitions return a new
//! state; dates inside are replaced, never mutated.

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;

/// The committed date or date range of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SelectionState {
    Single {
        date: Option<CalendarDate>,
    },
    /// Invariant: when both ends are set, `start <= end`.
    Range {
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
    },
}

impl SelectionState {
    pub fn single(date: Option<CalendarDate>) -> Self {
        SelectionState::Single { date }
    }

    /// Range from two optional ends, swapped if inverted.
    pub fn range(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if s > e => SelectionState::Range {
                start: Some(e),
                end: Some(s),
            },
            (None, Some(e)) => SelectionState::Range {
                start: Some(e),
                end: None,
            },
            _ => SelectionState::Range { start, end },
        }
    }

    pub fn empty_range() -> Self {
        SelectionState::Range {
            start: None,
            end: None,
        }
    }

    /// State after the user clicks `date`.
    ///
    /// Single mode always selects the date. Range mode fills the start, then
    /// the end (swapping an inverted pair), and a click on a complete range
    /// starts over from the clicked date.
    pub fn register_click(&self, date: CalendarDate) -> Self {
        match *self {
            SelectionState::Single { .. } => SelectionState::single(Some(date)),
            SelectionState::Range { start: None, .. } => SelectionState::Range {
                start: Some(date),
                end: None,
            },
            SelectionState::Range {
                start: Some(start),
                end: None,
            } => SelectionState::range(Some(start), Some(date)),
            SelectionState::Range {
                start: Some(_),
                end: Some(_),
            } => SelectionState::Range {
                start: Some(date),
                end: None,
            },
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SelectionState::Range { .. })
    }

    /// Selected date in single mode.
    pub fn selected(&self) -> Option<CalendarDate> {
        match *self {
            SelectionState::Single { date } => date,
            SelectionState::Range { .. } => None,
        }
    }

    pub fn start(&self) -> Option<CalendarDate> {
        match *self {
            SelectionState::Range { start, .. } => start,
            SelectionState::Single { .. } => None,
        }
    }

    pub fn end(&self) -> Option<CalendarDate> {
        match *self {
            SelectionState::Range { end, .. } => end,
            SelectionState::Single { .. } => None,
        }
    }

    /// A date is chosen, or both range ends are.
    pub fn is_complete(&self) -> bool {
        match *self {
            SelectionState::Single { date } => date.is_some(),
            SelectionState::Range { start, end } => start.is_some() && end.is_some(),
        }
    }

    /// `date` is the selected date or a range endpoint.
    pub fn is_active(&self, date: CalendarDate) -> bool {
        match *self {
            SelectionState::Single { date: selected } => selected == Some(date),
            SelectionState::Range { start, end } => start == Some(date) || end == Some(date),
        }
    }

    /// `date` lies strictly between the ends of a complete range.
    pub fn is_highlighted(&self, date: CalendarDate) -> bool {
        match *self {
            SelectionState::Range {
                start: Some(start),
                end: Some(end),
            } => start < date && date < end,
            _ => false,
        }
    }

    pub fn is_range_start(&self, date: CalendarDate) -> bool {
        self.is_range() && self.start() == Some(date)
    }

    pub fn is_range_end(&self, date: CalendarDate) -> bool {
        self.is_range() && self.end() == Some(date)
    }

    /// Same mode, nothing selected.
    pub fn clear(&self) -> Self {
        match self {
            SelectionState::Single { .. } => SelectionState::single(None),
            SelectionState::Range { .. } => SelectionState::empty_range(),
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::single(None)
    }
}
