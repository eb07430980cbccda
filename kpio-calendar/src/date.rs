//! Calendar dates and displayed months
//!
//! Months are zero-based (0 = January) on every public accessor that takes or
//! returns a bare month number, matching the rest of the picker API.

use core::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Error raised when a date cannot be built or moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// Month outside `0..=11`.
    MonthOutOfRange(u32),
    /// Day does not exist in the requested month.
    DayOutOfRange { year: i32, month0: u32, day: u32 },
    /// Result falls outside the representable calendar.
    Overflow,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::MonthOutOfRange(month) => write!(f, "month {} is out of range", month),
            DateError::DayOutOfRange { year, month0, day } => write!(
                f,
                "day {} does not exist in {:04}-{:02}",
                day,
                year,
                month0 + 1
            ),
            DateError::Overflow => write!(f, "date arithmetic overflowed"),
        }
    }
}

/// A concrete calendar day.
///
/// Dates are plain values: selection state replaces them, never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a date from a zero-based month.
    pub fn new(year: i32, month0: u32, day: u32) -> Result<Self, DateError> {
        if month0 > 11 {
            return Err(DateError::MonthOutOfRange(month0));
        }
        NaiveDate::from_ymd_opt(year, month0 + 1, day)
            .map(CalendarDate)
            .ok_or(DateError::DayOutOfRange { year, month0, day })
    }

    /// Create a date from a one-based month, as written in ISO dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        match month {
            1..=12 => Self::new(year, month - 1, day),
            _ => Err(DateError::MonthOutOfRange(month)),
        }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        CalendarDate(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Zero-based month.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// One-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Move by a signed number of days.
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        let moved = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        moved.map(CalendarDate).ok_or(DateError::Overflow)
    }

    /// First day of this date's month.
    pub fn first_of_month(&self) -> Self {
        DisplayedMonth::of(*self).first_day()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

/// The (year, month) a calendar is currently showing.
///
/// Stored as the first day of the month so every derived date is valid by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayedMonth(NaiveDate);

impl DisplayedMonth {
    /// Create from a zero-based month.
    pub fn new(year: i32, month0: u32) -> Result<Self, DateError> {
        CalendarDate::new(year, month0, 1).map(|d| DisplayedMonth(d.0))
    }

    /// The month containing `date`.
    pub fn of(date: CalendarDate) -> Self {
        // Day 1 of an existing month always exists.
        DisplayedMonth(date.0.with_day(1).unwrap_or(date.0))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Zero-based month.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Shift by a signed number of months, rolling years as needed.
    ///
    /// Works on the first of the month through chrono's month arithmetic, so
    /// `month0 = 0` shifted by `-1` lands on December of the previous year.
    pub fn shifted(&self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        let moved = if delta >= 0 {
            self.0.checked_add_months(months)
        } else {
            self.0.checked_sub_months(months)
        };
        moved.map(DisplayedMonth)
    }

    /// Previous month; saturates at the start of the representable calendar.
    pub fn prev(&self) -> Self {
        self.shifted(-1).unwrap_or(*self)
    }

    /// Next month; saturates at the end of the representable calendar.
    pub fn next(&self) -> Self {
        self.shifted(1).unwrap_or(*self)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: DisplayedMonth) -> i64 {
        let a = self.year() as i64 * 12 + self.month0() as i64;
        let b = other.year() as i64 * 12 + other.month0() as i64;
        b - a
    }

    pub fn days_in_month(&self) -> u32 {
        let (year, month) = (self.0.year(), self.0.month());
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
            .unwrap_or(28)
    }

    pub fn first_day(&self) -> CalendarDate {
        CalendarDate(self.0)
    }

    pub fn last_day(&self) -> CalendarDate {
        self.day(self.days_in_month()).unwrap_or(CalendarDate(self.0))
    }

    /// The given day number of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<CalendarDate> {
        self.0.with_day(day).map(CalendarDate)
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year() == self.year() && date.month0() == self.month0()
    }
}

impl From<CalendarDate> for DisplayedMonth {
    fn from(date: CalendarDate) -> Self {
        DisplayedMonth::of(date)
    }
}

impl fmt::Display for DisplayedMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month0() + 1)
    }
}

/// First column of the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Grid column (0..7) of a weekday.
    pub fn column_of(self, weekday: Weekday) -> usize {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_based_months() {
        let date = CalendarDate::new(2024, 0, 15).unwrap();
        assert_eq!(date.month0(), 0);
        assert_eq!(date.month(), 1);
        assert_eq!(alloc::format!("{}", date), "2024-01-15");
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert_eq!(
            CalendarDate::new(2023, 1, 29),
            Err(DateError::DayOutOfRange {
                year: 2023,
                month0: 1,
                day: 29
            })
        );
        assert_eq!(CalendarDate::new(2023, 12, 1), Err(DateError::MonthOutOfRange(12)));
        assert!(CalendarDate::from_ymd(2024, 0, 1).is_err());
    }

    #[test]
    fn test_shift_rolls_years() {
        let jan = DisplayedMonth::new(2024, 0).unwrap();
        assert_eq!(jan.prev(), DisplayedMonth::new(2023, 11).unwrap());

        let dec = DisplayedMonth::new(2024, 11).unwrap();
        assert_eq!(dec.next(), DisplayedMonth::new(2025, 0).unwrap());
        assert_eq!(dec.shifted(-23), DisplayedMonth::new(2023, 0).ok());
        assert_eq!(jan.months_until(dec), 11);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(DisplayedMonth::new(2024, 1).unwrap().days_in_month(), 29);
        assert_eq!(DisplayedMonth::new(2023, 1).unwrap().days_in_month(), 28);
        assert_eq!(DisplayedMonth::new(2024, 0).unwrap().days_in_month(), 31);
        assert_eq!(DisplayedMonth::new(2024, 3).unwrap().days_in_month(), 30);
    }

    #[test]
    fn test_month_membership() {
        let month = DisplayedMonth::new(2024, 1).unwrap();
        assert!(month.contains(CalendarDate::new(2024, 1, 29).unwrap()));
        assert!(!month.contains(CalendarDate::new(2023, 1, 28).unwrap()));
        assert_eq!(month.last_day(), CalendarDate::new(2024, 1, 29).unwrap());
        assert_eq!(month.day(30), None);
    }

    #[test]
    fn test_week_start_columns() {
        assert_eq!(WeekStart::Sunday.column_of(Weekday::Sun), 0);
        assert_eq!(WeekStart::Sunday.column_of(Weekday::Sat), 6);
        assert_eq!(WeekStart::Monday.column_of(Weekday::Sun), 6);
        assert_eq!(WeekStart::Monday.column_of(Weekday::Mon), 0);
    }

    #[test]
    fn test_add_days() {
        let date = CalendarDate::new(2024, 0, 1).unwrap();
        assert_eq!(date.add_days(-1).unwrap(), CalendarDate::new(2023, 11, 31).unwrap());
        assert_eq!(date.add_days(31).unwrap(), CalendarDate::new(2024, 1, 1).unwrap());
    }
}
