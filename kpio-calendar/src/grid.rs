//! Month grid layout
//!
//! A month is laid out as whole weeks: the leading slots hold the tail of the
//! previous month, then every day of the displayed month, then the head of the
//! next month until the last week is full. At most six weeks (42 slots).

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::date::{CalendarDate, DateError, DisplayedMonth, WeekStart};
use crate::selection::SelectionState;

/// Maximum number of slots in a grid.
pub const MAX_SLOTS: usize = 42;

/// Which month a grid slot's day number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellMonth {
    Previous,
    Current,
    Next,
}

/// One undecorated slot of a grid: a day number and its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSlot {
    pub day: u32,
    pub month: CellMonth,
}

impl GridSlot {
    pub fn belongs_to_displayed_month(&self) -> bool {
        self.month == CellMonth::Current
    }
}

bitflags! {
    /// Display state of a decorated cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// Day of the previous or next month.
        const OUTSIDE     = 1 << 0;
        /// Not selectable and never focused.
        const DISABLED    = 1 << 1;
        /// Selected date or range endpoint.
        const ACTIVE      = 1 << 2;
        /// Strictly between the range endpoints.
        const HIGHLIGHTED = 1 << 3;
        const TODAY       = 1 << 4;
        const RANGE_START = 1 << 5;
        const RANGE_END   = 1 << 6;
        /// Outside slot rendered without a day number.
        const PLACEHOLDER = 1 << 7;
    }
}

/// Inputs to decoration besides the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellContext {
    pub hide_other_month_days: bool,
    pub today: Option<CalendarDate>,
}

/// A grid slot with its display flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayCell {
    /// Position in the grid, row-major.
    pub index: usize,
    pub day_number: u32,
    pub date: Option<CalendarDate>,
    pub flags: CellFlags,
}

impl DayCell {
    pub fn belongs_to_displayed_month(&self) -> bool {
        !self.flags.contains(CellFlags::OUTSIDE)
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.contains(CellFlags::DISABLED)
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(CellFlags::ACTIVE)
    }

    pub fn is_highlighted(&self) -> bool {
        self.flags.contains(CellFlags::HIGHLIGHTED)
    }

    pub fn is_today(&self) -> bool {
        self.flags.contains(CellFlags::TODAY)
    }

    pub fn is_placeholder(&self) -> bool {
        self.flags.contains(CellFlags::PLACEHOLDER)
    }
}

/// Layout of one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: DisplayedMonth,
    week_start: WeekStart,
    lead_days: usize,
    trail_days: usize,
    days_in_month: u32,
    slots: Vec<GridSlot>,
}

impl MonthGrid {
    /// Lay out `month` with weeks beginning on `week_start`.
    pub fn compute(month: DisplayedMonth, week_start: WeekStart) -> Self {
        let days_in_month = month.days_in_month();
        let lead_days = week_start.column_of(month.first_day().weekday());
        let trail_days = 6 - week_start.column_of(month.last_day().weekday());
        let days_in_prior = month.prev().days_in_month();

        let mut slots = Vec::with_capacity(lead_days + days_in_month as usize + trail_days);
        for i in 1..=lead_days {
            slots.push(GridSlot {
                day: days_in_prior - (lead_days - i) as u32,
                month: CellMonth::Previous,
            });
        }
        for day in 1..=days_in_month {
            slots.push(GridSlot {
                day,
                month: CellMonth::Current,
            });
        }
        for day in 1..=trail_days as u32 {
            slots.push(GridSlot {
                day,
                month: CellMonth::Next,
            });
        }

        Self {
            month,
            week_start,
            lead_days,
            trail_days,
            days_in_month,
            slots,
        }
    }

    pub fn month(&self) -> DisplayedMonth {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn lead_days(&self) -> usize {
        self.lead_days
    }

    pub fn trail_days(&self) -> usize {
        self.trail_days
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn slots(&self) -> &[GridSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of week rows.
    pub fn rows(&self) -> usize {
        self.slots.len() / 7
    }

    /// Concrete date of the slot at `index`.
    pub fn date_at(&self, index: usize) -> Option<CalendarDate> {
        let slot = self.slots.get(index)?;
        let month = match slot.month {
            CellMonth::Previous => self.month.shifted(-1)?,
            CellMonth::Current => self.month,
            CellMonth::Next => self.month.shifted(1)?,
        };
        month.day(slot.day)
    }

    /// Apply selection and context flags to every slot.
    pub fn decorate(&self, selection: &SelectionState, ctx: &CellContext) -> Vec<DayCell> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let date = self.date_at(index);

                if !slot.belongs_to_displayed_month() {
                    let mut flags = CellFlags::OUTSIDE | CellFlags::DISABLED;
                    if ctx.hide_other_month_days {
                        flags |= CellFlags::PLACEHOLDER;
                    }
                    return DayCell {
                        index,
                        day_number: slot.day,
                        date,
                        flags,
                    };
                }

                let mut flags = CellFlags::empty();
                if let Some(date) = date {
                    flags.set(CellFlags::ACTIVE, selection.is_active(date));
                    flags.set(CellFlags::HIGHLIGHTED, selection.is_highlighted(date));
                    flags.set(CellFlags::RANGE_START, selection.is_range_start(date));
                    flags.set(CellFlags::RANGE_END, selection.is_range_end(date));
                    flags.set(CellFlags::TODAY, ctx.today == Some(date));
                }
                DayCell {
                    index,
                    day_number: slot.day,
                    date,
                    flags,
                }
            })
            .collect()
    }

    /// Grid index of a day of the displayed month.
    pub fn index_of_day(&self, day: u32) -> Option<usize> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        Some(self.lead_days + day as usize - 1)
    }

    /// Day number at `index` if that slot is in the displayed month.
    pub fn day_at(&self, index: usize) -> Option<u32> {
        self.slots
            .get(index)
            .filter(|slot| slot.belongs_to_displayed_month())
            .map(|slot| slot.day)
    }

    /// Move `delta` slots from `index`.
    ///
    /// Yields the target only when it is an enabled (current month) slot;
    /// `±1` moves along a row and `±7` moves a week.
    pub fn step(&self, index: usize, delta: isize) -> Option<usize> {
        let target = index.checked_add_signed(delta)?;
        self.day_at(target).map(|_| target)
    }

    pub fn first_enabled(&self) -> Option<usize> {
        self.index_of_day(1)
    }

    pub fn last_enabled(&self) -> Option<usize> {
        self.index_of_day(self.days_in_month)
    }

    /// `(row, column)` of a grid index.
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / 7, index % 7)
    }
}

/// Compute the grid for a zero-based month.
pub fn compute_grid(
    year: i32,
    month0: u32,
    week_start: WeekStart,
) -> Result<MonthGrid, DateError> {
    DisplayedMonth::new(year, month0).map(|month| MonthGrid::compute(month, week_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_january_2024_sunday_start() {
        // 2024-01-01 is a Monday, 2024-01-31 a Wednesday.
        let grid = compute_grid(2024, 0, WeekStart::Sunday).unwrap();
        assert_eq!(grid.lead_days(), 1);
        assert_eq!(grid.trail_days(), 3);
        assert_eq!(grid.len(), 35);
        assert_eq!(
            grid.slots()[0],
            GridSlot {
                day: 31,
                month: CellMonth::Previous
            }
        );
        assert_eq!(
            grid.slots()[34],
            GridSlot {
                day: 3,
                month: CellMonth::Next
            }
        );
        assert_eq!(grid.date_at(0), Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_no_leading_days_when_month_starts_on_week_start() {
        // September 2024 starts on a Sunday.
        let grid = compute_grid(2024, 8, WeekStart::Sunday).unwrap();
        assert_eq!(grid.lead_days(), 0);
        assert_eq!(grid.slots()[0].day, 1);

        let monday = compute_grid(2024, 8, WeekStart::Monday).unwrap();
        assert_eq!(monday.lead_days(), 6);
    }

    #[test]
    fn test_february_2015_fits_four_rows() {
        let grid = compute_grid(2015, 1, WeekStart::Sunday).unwrap();
        assert_eq!(grid.len(), 28);
        assert_eq!(grid.rows(), 4);
    }

    #[test]
    fn test_decorate_single_selection() {
        let grid = compute_grid(2024, 0, WeekStart::Sunday).unwrap();
        let selection = SelectionState::single(Some(date(2024, 1, 15)));
        let ctx = CellContext {
            hide_other_month_days: false,
            today: Some(date(2024, 1, 2)),
        };
        let cells = grid.decorate(&selection, &ctx);

        let active: Vec<_> = cells.iter().filter(|c| c.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].day_number, 15);
        assert_eq!(active[0].index, grid.index_of_day(15).unwrap());

        assert!(cells[0].is_disabled());
        assert!(!cells[0].belongs_to_displayed_month());
        assert!(!cells[0].is_placeholder());
        assert!(cells[grid.index_of_day(2).unwrap()].is_today());
    }

    #[test]
    fn test_decorate_range_and_placeholders() {
        let grid = compute_grid(2024, 0, WeekStart::Sunday).unwrap();
        let selection = SelectionState::range(Some(date(2024, 1, 10)), Some(date(2024, 1, 13)));
        let ctx = CellContext {
            hide_other_month_days: true,
            today: None,
        };
        let cells = grid.decorate(&selection, &ctx);

        let highlighted: Vec<u32> = cells
            .iter()
            .filter(|c| c.is_highlighted())
            .map(|c| c.day_number)
            .collect();
        assert_eq!(highlighted, alloc::vec![11, 12]);

        let start = &cells[grid.index_of_day(10).unwrap()];
        assert!(start.is_active());
        assert!(start.flags.contains(CellFlags::RANGE_START));
        assert!(cells[0].is_placeholder());
    }

    #[test]
    fn test_range_spanning_months_highlights_whole_middle_month() {
        let grid = compute_grid(2024, 1, WeekStart::Sunday).unwrap();
        let selection = SelectionState::range(Some(date(2024, 1, 20)), Some(date(2024, 3, 5)));
        let cells = grid.decorate(&selection, &CellContext::default());
        let in_month = cells.iter().filter(|c| c.belongs_to_displayed_month());
        assert!(in_month.clone().all(|c| c.is_highlighted()));
        assert!(in_month.clone().all(|c| !c.is_active()));
    }

    #[test]
    fn test_index_navigation() {
        // March 2024: starts on Friday (lead 5), 31 days.
        let grid = compute_grid(2024, 2, WeekStart::Sunday).unwrap();
        let first = grid.first_enabled().unwrap();
        assert_eq!(first, 5);
        assert_eq!(grid.day_at(first), Some(1));
        assert_eq!(grid.step(first, -1), None);
        assert_eq!(grid.step(first, 7), grid.index_of_day(8));
        let last = grid.last_enabled().unwrap();
        assert_eq!(grid.day_at(last), Some(31));
        assert_eq!(grid.step(last, 1), None);
        assert_eq!(grid.row_col(last), (5, 0));
        assert_eq!(grid.index_of_day(0), None);
        assert_eq!(grid.index_of_day(32), None);
    }
}
