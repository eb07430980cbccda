//! Locale tables
//!
//! Month and weekday labels used by the header, the weekday row and the
//! name-based format tokens.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::Weekday;

use crate::date::{DisplayedMonth, WeekStart};

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EN_WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];
const EN_WEEKDAYS_SHORT: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const DE_MONTHS: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const DE_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];
const DE_WEEKDAYS: [&str; 7] = [
    "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
];
const DE_WEEKDAYS_SHORT: [&str; 7] = ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"];

const FR_MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const FR_MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];
const FR_WEEKDAYS: [&str; 7] = [
    "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
];
const FR_WEEKDAYS_SHORT: [&str; 7] = ["di", "lu", "ma", "me", "je", "ve", "sa"];

const ES_MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];
const ES_MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];
const ES_WEEKDAYS: [&str; 7] = [
    "domingo", "lunes", "martes", "miércoles", "jueves", "viernes", "sábado",
];
const ES_WEEKDAYS_SHORT: [&str; 7] = ["do", "lu", "ma", "mi", "ju", "vi", "sá"];

/// Month and weekday labels for one language.
///
/// Weekday arrays are Sunday-first regardless of the grid's week start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    language: Cow<'static, str>,
    months: [Cow<'static, str>; 12],
    months_short: [Cow<'static, str>; 12],
    weekdays: [Cow<'static, str>; 7],
    weekdays_short: [Cow<'static, str>; 7],
}

impl LocaleTable {
    fn builtin(
        language: &'static str,
        months: &[&'static str; 12],
        months_short: &[&'static str; 12],
        weekdays: &[&'static str; 7],
        weekdays_short: &[&'static str; 7],
    ) -> Self {
        Self {
            language: Cow::Borrowed(language),
            months: months.map(Cow::Borrowed),
            months_short: months_short.map(Cow::Borrowed),
            weekdays: weekdays.map(Cow::Borrowed),
            weekdays_short: weekdays_short.map(Cow::Borrowed),
        }
    }

    pub fn english() -> Self {
        Self::builtin("en", &EN_MONTHS, &EN_MONTHS_SHORT, &EN_WEEKDAYS, &EN_WEEKDAYS_SHORT)
    }

    pub fn german() -> Self {
        Self::builtin("de", &DE_MONTHS, &DE_MONTHS_SHORT, &DE_WEEKDAYS, &DE_WEEKDAYS_SHORT)
    }

    pub fn french() -> Self {
        Self::builtin("fr", &FR_MONTHS, &FR_MONTHS_SHORT, &FR_WEEKDAYS, &FR_WEEKDAYS_SHORT)
    }

    pub fn spanish() -> Self {
        Self::builtin("es", &ES_MONTHS, &ES_MONTHS_SHORT, &ES_WEEKDAYS, &ES_WEEKDAYS_SHORT)
    }

    /// Build a table from caller-supplied labels.
    pub fn custom(
        language: &str,
        months: [String; 12],
        months_short: [String; 12],
        weekdays: [String; 7],
        weekdays_short: [String; 7],
    ) -> Self {
        Self {
            language: Cow::Owned(language.into()),
            months: months.map(Cow::Owned),
            months_short: months_short.map(Cow::Owned),
            weekdays: weekdays.map(Cow::Owned),
            weekdays_short: weekdays_short.map(Cow::Owned),
        }
    }

    /// Pick a built-in table by BCP 47 tag (`de-DE`, `fr_CA`, `es`).
    ///
    /// Only the language subtag is considered; unknown languages fall back to
    /// English.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" => Self::german(),
            "fr" => Self::french(),
            "es" => Self::spanish(),
            _ => Self::english(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Full month name for a zero-based month.
    pub fn month_name(&self, month0: u32) -> &str {
        self.months.get(month0 as usize).map(|m| m.as_ref()).unwrap_or("")
    }

    /// Abbreviated month name for a zero-based month.
    pub fn month_abbrev(&self, month0: u32) -> &str {
        self.months_short
            .get(month0 as usize)
            .map(|m| m.as_ref())
            .unwrap_or("")
    }

    pub fn weekday_name(&self, weekday: Weekday) -> &str {
        &self.weekdays[weekday.num_days_from_sunday() as usize]
    }

    pub fn weekday_short(&self, weekday: Weekday) -> &str {
        &self.weekdays_short[weekday.num_days_from_sunday() as usize]
    }

    /// Weekday header labels in grid order.
    pub fn weekday_header(&self, week_start: WeekStart) -> Vec<&str> {
        let mut weekday = week_start.weekday();
        let mut labels = Vec::with_capacity(7);
        for _ in 0..7 {
            labels.push(self.weekday_short(weekday));
            weekday = weekday.succ();
        }
        labels
    }

    /// Header title such as `January 2024`.
    pub fn title(&self, month: DisplayedMonth) -> String {
        alloc::format!("{} {}", self.month_name(month.month0()), month.year())
    }

    pub(crate) fn months(&self) -> impl Iterator<Item = &str> {
        self.months.iter().map(|m| m.as_ref())
    }

    pub(crate) fn months_short(&self) -> impl Iterator<Item = &str> {
        self.months_short.iter().map(|m| m.as_ref())
    }

    pub(crate) fn weekdays(&self) -> impl Iterator<Item = &str> {
        self.weekdays.iter().map(|m| m.as_ref())
    }

    pub(crate) fn weekdays_short(&self) -> impl Iterator<Item = &str> {
        self.weekdays_short.iter().map(|m| m.as_ref())
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::english()
    }
}
