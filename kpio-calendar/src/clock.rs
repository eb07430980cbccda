//! Source of "today"

use crate::date::CalendarDate;

/// Supplies the current local date.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

/// Local wall-clock date.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from_naive(chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = CalendarDate::from_ymd(2024, 6, 1).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }
}
