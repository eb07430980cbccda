//! Date formatting and parsing
//!
//! Patterns use the familiar day.js/moment token set:
//!
//! | Token  | Meaning                      | Example   |
//! |--------|------------------------------|-----------|
//! | `YYYY` | four digit year              | `2024`    |
//! | `YY`   | two digit year (69 pivot)    | `24`      |
//! | `MMMM` | month name                   | `January` |
//! | `MMM`  | abbreviated month name       | `Jan`     |
//! | `MM`   | zero-padded month            | `01`      |
//! | `M`    | month                        | `1`       |
//! | `DD`   | zero-padded day              | `05`      |
//! | `D`    | day                          | `5`       |
//! | `dddd` | weekday name                 | `Friday`  |
//! | `ddd`  | short weekday label          | `Fr`      |
//! | `[..]` | escaped literal text         | `[at]`    |
//!
//! Anything else is literal text that must appear verbatim when parsing.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

use chrono::Weekday;

use crate::date::CalendarDate;
use crate::locale::LocaleTable;

/// Pattern used when a widget is not given one.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

/// Date component a token reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
    Weekday,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Weekday => "weekday",
        };
        f.write_str(name)
    }
}

/// Error returned when text does not match a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or whitespace.
    Empty,
    /// Literal text at `position` did not match.
    Literal { position: usize, expected: String },
    /// A numeric field had the wrong digits.
    InvalidNumber { position: usize, field: Field },
    /// A month or weekday name was not recognised.
    UnknownName { position: usize, field: Field },
    /// Input continued after the pattern ended.
    TrailingInput { position: usize },
    /// The pattern never sets this field.
    MissingField(Field),
    /// The same field was given two different values.
    ConflictingField(Field),
    /// The fields do not form an existing date.
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Parsed weekday disagrees with the date.
    WeekdayMismatch,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "no date given"),
            ParseError::Literal { position, expected } => {
                write!(f, "expected \"{}\" at position {}", expected, position)
            }
            ParseError::InvalidNumber { position, field } => {
                write!(f, "invalid {} at position {}", field, position)
            }
            ParseError::UnknownName { position, field } => {
                write!(f, "unknown {} name at position {}", field, position)
            }
            ParseError::TrailingInput { position } => {
                write!(f, "unexpected text at position {}", position)
            }
            ParseError::MissingField(field) => write!(f, "pattern has no {} field", field),
            ParseError::ConflictingField(field) => write!(f, "conflicting {} values", field),
            ParseError::InvalidDate { year, month, day } => {
                write!(f, "{:04}-{:02}-{:02} is not a calendar date", year, month, day)
            }
            ParseError::WeekdayMismatch => write!(f, "weekday does not match the date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    MonthName,
    MonthAbbrev,
    Month2,
    Month1,
    Day2,
    Day1,
    WeekdayName,
    WeekdayShort,
    Literal(String),
}

/// Ordered longest-first so `MMMM` wins over `MM`.
const TOKENS: [(&str, Token); 10] = [
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthAbbrev),
    ("MM", Token::Month2),
    ("M", Token::Month1),
    ("DD", Token::Day2),
    ("D", Token::Day1),
    ("dddd", Token::WeekdayName),
    ("ddd", Token::WeekdayShort),
];

fn compile(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        if let Some(escaped) = rest.strip_prefix('[') {
            if let Some(end) = escaped.find(']') {
                literal.push_str(&escaped[..end]);
                rest = &escaped[end + 1..];
                continue;
            }
        }

        for (text, token) in TOKENS.iter() {
            if let Some(after) = rest.strip_prefix(text) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(core::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = after;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// Formats and parses dates against one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
    tokens: Vec<Token>,
    locale: LocaleTable,
}

impl DateFormatter {
    /// Formatter with English names.
    pub fn new(pattern: &str) -> Self {
        Self::with_locale(pattern, LocaleTable::english())
    }

    pub fn with_locale(pattern: &str, locale: LocaleTable) -> Self {
        let tokens = compile(pattern);
        if tokens.iter().all(|t| matches!(t, Token::Literal(_))) {
            log::warn!("[KPIO Calendar] pattern {:?} has no date fields", pattern);
        }
        Self {
            pattern: pattern.into(),
            tokens,
            locale,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn locale(&self) -> &LocaleTable {
        &self.locale
    }

    /// Render `date` with the pattern.
    pub fn format(&self, date: CalendarDate) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match token {
                Token::Year4 => write!(out, "{:04}", date.year()),
                Token::Year2 => write!(out, "{:02}", date.year().rem_euclid(100)),
                Token::MonthName => out.write_str(self.locale.month_name(date.month0())),
                Token::MonthAbbrev => out.write_str(self.locale.month_abbrev(date.month0())),
                Token::Month2 => write!(out, "{:02}", date.month()),
                Token::Month1 => write!(out, "{}", date.month()),
                Token::Day2 => write!(out, "{:02}", date.day()),
                Token::Day1 => write!(out, "{}", date.day()),
                Token::WeekdayName => out.write_str(self.locale.weekday_name(date.weekday())),
                Token::WeekdayShort => out.write_str(self.locale.weekday_short(date.weekday())),
                Token::Literal(text) => out.write_str(text),
            };
        }
        out
    }

    /// Parse `input` strictly against the pattern.
    ///
    /// Every token must consume input, no text may follow the pattern, and
    /// the resulting date must exist.
    pub fn parse(&self, input: &str) -> Result<CalendarDate, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut fields = Fields::default();
        let mut pos = 0usize;

        for token in &self.tokens {
            let rest = &input[pos..];
            match token {
                Token::Literal(text) => {
                    if !rest.starts_with(text.as_str()) {
                        return Err(ParseError::Literal {
                            position: pos,
                            expected: text.clone(),
                        });
                    }
                    pos += text.len();
                }
                Token::Year4 => {
                    let (value, used) = digits(rest, 4, 4, pos, Field::Year)?;
                    fields.set(Field::Year, value as i32)?;
                    pos += used;
                }
                Token::Year2 => {
                    let (value, used) = digits(rest, 2, 2, pos, Field::Year)?;
                    let year = if value < 69 { 2000 + value } else { 1900 + value };
                    fields.set(Field::Year, year as i32)?;
                    pos += used;
                }
                Token::Month2 | Token::Month1 => {
                    let min = if *token == Token::Month2 { 2 } else { 1 };
                    let (value, used) = digits(rest, min, 2, pos, Field::Month)?;
                    fields.set(Field::Month, value as i32)?;
                    pos += used;
                }
                Token::Day2 | Token::Day1 => {
                    let min = if *token == Token::Day2 { 2 } else { 1 };
                    let (value, used) = digits(rest, min, 2, pos, Field::Day)?;
                    fields.set(Field::Day, value as i32)?;
                    pos += used;
                }
                Token::MonthName | Token::MonthAbbrev => {
                    let names: Vec<&str> = if *token == Token::MonthName {
                        self.locale.months().collect()
                    } else {
                        self.locale.months_short().collect()
                    };
                    let (index, used) = longest_name(rest, &names).ok_or(
                        ParseError::UnknownName {
                            position: pos,
                            field: Field::Month,
                        },
                    )?;
                    fields.set(Field::Month, index as i32 + 1)?;
                    pos += used;
                }
                Token::WeekdayName | Token::WeekdayShort => {
                    let names: Vec<&str> = if *token == Token::WeekdayName {
                        self.locale.weekdays().collect()
                    } else {
                        self.locale.weekdays_short().collect()
                    };
                    let (index, used) = longest_name(rest, &names).ok_or(
                        ParseError::UnknownName {
                            position: pos,
                            field: Field::Weekday,
                        },
                    )?;
                    fields.set(Field::Weekday, index as i32)?;
                    pos += used;
                }
            }
        }

        if pos < input.len() {
            return Err(ParseError::TrailingInput { position: pos });
        }

        fields.resolve()
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

#[derive(Default)]
struct Fields {
    year: Option<i32>,
    month: Option<i32>,
    day: Option<i32>,
    weekday: Option<i32>,
}

impl Fields {
    fn set(&mut self, field: Field, value: i32) -> Result<(), ParseError> {
        let slot = match field {
            Field::Year => &mut self.year,
            Field::Month => &mut self.month,
            Field::Day => &mut self.day,
            Field::Weekday => &mut self.weekday,
        };
        match slot {
            Some(existing) if *existing != value => Err(ParseError::ConflictingField(field)),
            _ => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    fn resolve(self) -> Result<CalendarDate, ParseError> {
        let year = self.year.ok_or(ParseError::MissingField(Field::Year))?;
        let month = self.month.ok_or(ParseError::MissingField(Field::Month))?;
        let day = self.day.ok_or(ParseError::MissingField(Field::Day))?;

        let invalid = ParseError::InvalidDate {
            year,
            month: month as u32,
            day: day as u32,
        };
        let date = CalendarDate::from_ymd(year, month as u32, day as u32).map_err(|_| invalid)?;

        if let Some(weekday) = self.weekday {
            if date.weekday().num_days_from_sunday() as i32 != weekday {
                return Err(ParseError::WeekdayMismatch);
            }
        }
        Ok(date)
    }
}

/// Read between `min` and `max` ASCII digits from the front of `rest`.
fn digits(
    rest: &str,
    min: usize,
    max: usize,
    position: usize,
    field: Field,
) -> Result<(u32, usize), ParseError> {
    let count = rest
        .bytes()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if count < min {
        return Err(ParseError::InvalidNumber { position, field });
    }
    rest[..count]
        .parse::<u32>()
        .map(|value| (value, count))
        .map_err(|_| ParseError::InvalidNumber { position, field })
}

/// Case-insensitive longest match of one of `names` at the front of `rest`.
///
/// Returns the matched index and the number of bytes consumed.
fn longest_name(rest: &str, names: &[&str]) -> Option<(usize, usize)> {
    names
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .filter_map(|(index, name)| match_ignore_case(rest, name).map(|used| (index, used)))
        .max_by_key(|&(_, used)| used)
}

fn match_ignore_case(rest: &str, word: &str) -> Option<usize> {
    let mut consumed = 0;
    let mut input = rest.chars();
    for expected in word.chars() {
        let actual = input.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        consumed += actual.len_utf8();
    }
    Some(consumed)
}

/// Weekday for a Sunday-based index, used by callers rendering headers.
pub fn weekday_from_sunday(index: usize) -> Weekday {
    let mut weekday = Weekday::Sun;
    for _ in 0..index % 7 {
        weekday = weekday.succ();
    }
    weekday
}
