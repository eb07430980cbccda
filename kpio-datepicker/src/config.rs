//! Widget options and configuration files.
//!
//! Options are plain structs with a `Default` per field and chained `with_*`
//! setters. Callbacks are `Rc<dyn Fn>` so options can be cloned into the
//! calendars a composite widget builds. The data-only subset can also come
//! from a TOML file through [`PickerConfig`].

use std::path::Path;
use std::rc::Rc;

use kpio_calendar::{
    CalendarDate, Clock, DateFormatter, DisplayedMonth, LocaleTable, SystemClock, WeekStart,
    DEFAULT_PATTERN,
};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::connector::CalendarConnector;
use crate::error::PickerError;
use crate::range::RangePicker;
use crate::shell::MountTarget;
use crate::theme::Theme;

// ── Callback payloads ────────────────────────────────────────────────

/// Range change payload, dates formatted with the picker's pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeChange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Navigation payload.
#[derive(Clone)]
pub struct NavEvent {
    pub displayed_month: DisplayedMonth,
    pub calendar: Calendar,
}

/// Single-mode change: the formatted date.
pub type ChangeCallback = Rc<dyn Fn(&str)>;
pub type RangeChangeCallback = Rc<dyn Fn(&RangeChange)>;
pub type NavCallback = Rc<dyn Fn(&NavEvent)>;
pub type RenderCallback = Rc<dyn Fn(&Calendar)>;
pub type RangeRenderCallback = Rc<dyn Fn(&RangePicker)>;

// ── Options ──────────────────────────────────────────────────────────

/// Initial date: a value, or text parsed with the widget's pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialDate {
    Date(CalendarDate),
    Text(String),
}

impl InitialDate {
    /// Resolve against `formatter`; text that does not parse is an error.
    pub fn resolve(&self, formatter: &DateFormatter) -> Result<CalendarDate, PickerError> {
        match self {
            InitialDate::Date(date) => Ok(*date),
            InitialDate::Text(text) => {
                formatter
                    .parse(text)
                    .map_err(|reason| PickerError::InvalidInitialDate {
                        value: text.clone(),
                        reason,
                    })
            }
        }
    }
}

impl From<CalendarDate> for InitialDate {
    fn from(date: CalendarDate) -> Self {
        InitialDate::Date(date)
    }
}

impl From<&str> for InitialDate {
    fn from(text: &str) -> Self {
        InitialDate::Text(text.into())
    }
}

/// Shortcut button of a range picker.
#[derive(Clone)]
pub struct PredefinedRange {
    pub label: String,
    pub get_range: Rc<dyn Fn() -> (CalendarDate, CalendarDate)>,
}

impl PredefinedRange {
    pub fn new(label: &str, get_range: impl Fn() -> (CalendarDate, CalendarDate) + 'static) -> Self {
        PredefinedRange {
            label: label.into(),
            get_range: Rc::new(get_range),
        }
    }

    /// A range that never moves.
    pub fn fixed(label: &str, start: CalendarDate, end: CalendarDate) -> Self {
        Self::new(label, move || (start, end))
    }
}

pub const DEFAULT_INPUT_LABEL: &str = "Set a date";
pub const DEFAULT_INPUT_PLACEHOLDER: &str = "Enter a date";

/// Options of a single calendar.
///
/// A [`CalendarToggle`](crate::toggle::CalendarToggle) takes the same
/// options and forces `hide_inputs`.
#[derive(Clone)]
pub struct CalendarOptions {
    pub element: MountTarget,
    pub selected_date: Option<InitialDate>,
    pub format: String,
    pub locale: LocaleTable,
    pub week_start: WeekStart,
    pub theme: Theme,
    pub styles: String,
    pub dark_mode: bool,
    /// Follow the page's colour-scheme preference.
    pub dark_mode_auto: bool,
    /// Markup for the previous-month button; a chevron when unset.
    pub icon_prev: Option<String>,
    pub icon_next: Option<String>,
    pub hide_prev_nav: bool,
    pub hide_next_nav: bool,
    pub input_label: String,
    pub input_placeholder: String,
    pub hide_inputs: bool,
    pub hide_other_month_days: bool,
    pub range_mode: bool,
    /// Shared range; only used with `range_mode`.
    pub connector: Option<CalendarConnector>,
    pub clock: Rc<dyn Clock>,
    pub on_change: Option<ChangeCallback>,
    pub on_render: Option<RenderCallback>,
    pub on_next_nav: Option<NavCallback>,
    pub on_prev_nav: Option<NavCallback>,
}

pub type ToggleOptions = CalendarOptions;

impl CalendarOptions {
    pub fn new(element: impl Into<MountTarget>) -> Self {
        CalendarOptions {
            element: element.into(),
            ..Default::default()
        }
    }

    pub fn with_selected_date(mut self, date: impl Into<InitialDate>) -> Self {
        self.selected_date = Some(date.into());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_locale(mut self, locale: LocaleTable) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_styles(mut self, styles: &str) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.dark_mode = dark;
        self
    }

    pub fn with_dark_mode_auto(mut self, auto: bool) -> Self {
        self.dark_mode_auto = auto;
        self
    }

    pub fn with_icons(mut self, prev: &str, next: &str) -> Self {
        self.icon_prev = Some(prev.into());
        self.icon_next = Some(next.into());
        self
    }

    pub fn with_hidden_nav(mut self, hide_prev: bool, hide_next: bool) -> Self {
        self.hide_prev_nav = hide_prev;
        self.hide_next_nav = hide_next;
        self
    }

    pub fn with_input_label(mut self, label: &str) -> Self {
        self.input_label = label.into();
        self
    }

    pub fn with_input_placeholder(mut self, placeholder: &str) -> Self {
        self.input_placeholder = placeholder.into();
        self
    }

    pub fn with_hide_inputs(mut self, hide: bool) -> Self {
        self.hide_inputs = hide;
        self
    }

    pub fn with_hide_other_month_days(mut self, hide: bool) -> Self {
        self.hide_other_month_days = hide;
        self
    }

    /// Range mode, optionally joined to a shared connector.
    pub fn with_range_mode(mut self, connector: Option<CalendarConnector>) -> Self {
        self.range_mode = true;
        self.connector = connector;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    pub fn on_render(mut self, callback: impl Fn(&Calendar) + 'static) -> Self {
        self.on_render = Some(Rc::new(callback));
        self
    }

    pub fn on_next_nav(mut self, callback: impl Fn(&NavEvent) + 'static) -> Self {
        self.on_next_nav = Some(Rc::new(callback));
        self
    }

    pub fn on_prev_nav(mut self, callback: impl Fn(&NavEvent) + 'static) -> Self {
        self.on_prev_nav = Some(Rc::new(callback));
        self
    }

    /// Formatter for the configured pattern and locale.
    pub fn formatter(&self) -> DateFormatter {
        DateFormatter::with_locale(&self.format, self.locale.clone())
    }
}

impl Default for CalendarOptions {
    fn default() -> Self {
        CalendarOptions {
            element: MountTarget::Selector("body".into()),
            selected_date: None,
            format: DEFAULT_PATTERN.into(),
            locale: LocaleTable::english(),
            week_start: WeekStart::Sunday,
            theme: Theme::Unstyled,
            styles: String::new(),
            dark_mode: false,
            dark_mode_auto: false,
            icon_prev: None,
            icon_next: None,
            hide_prev_nav: false,
            hide_next_nav: false,
            input_label: DEFAULT_INPUT_LABEL.into(),
            input_placeholder: DEFAULT_INPUT_PLACEHOLDER.into(),
            hide_inputs: false,
            hide_other_month_days: false,
            range_mode: false,
            connector: None,
            clock: Rc::new(SystemClock),
            on_change: None,
            on_render: None,
            on_next_nav: None,
            on_prev_nav: None,
        }
    }
}

/// Options of a range picker.
#[derive(Clone)]
pub struct RangeOptions {
    pub element: MountTarget,
    /// Anchors the left calendar's month; today when unset.
    pub selected_date: Option<InitialDate>,
    pub format: String,
    pub locale: LocaleTable,
    pub week_start: WeekStart,
    pub theme: Theme,
    pub styles: String,
    pub dark_mode: bool,
    pub dark_mode_auto: bool,
    pub icon_prev: Option<String>,
    pub icon_next: Option<String>,
    pub predefined_ranges: Vec<PredefinedRange>,
    pub clock: Rc<dyn Clock>,
    pub on_change: Option<RangeChangeCallback>,
    pub on_render: Option<RangeRenderCallback>,
}

impl RangeOptions {
    pub fn new(element: impl Into<MountTarget>) -> Self {
        RangeOptions {
            element: element.into(),
            ..Default::default()
        }
    }

    pub fn with_selected_date(mut self, date: impl Into<InitialDate>) -> Self {
        self.selected_date = Some(date.into());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_locale(mut self, locale: LocaleTable) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_styles(mut self, styles: &str) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.dark_mode = dark;
        self
    }

    pub fn with_dark_mode_auto(mut self, auto: bool) -> Self {
        self.dark_mode_auto = auto;
        self
    }

    pub fn with_icons(mut self, prev: &str, next: &str) -> Self {
        self.icon_prev = Some(prev.into());
        self.icon_next = Some(next.into());
        self
    }

    pub fn with_predefined_range(mut self, range: PredefinedRange) -> Self {
        self.predefined_ranges.push(range);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&RangeChange) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    pub fn on_render(mut self, callback: impl Fn(&RangePicker) + 'static) -> Self {
        self.on_render = Some(Rc::new(callback));
        self
    }

    pub fn formatter(&self) -> DateFormatter {
        DateFormatter::with_locale(&self.format, self.locale.clone())
    }
}

impl Default for RangeOptions {
    fn default() -> Self {
        RangeOptions {
            element: MountTarget::Selector("body".into()),
            selected_date: None,
            format: DEFAULT_PATTERN.into(),
            locale: LocaleTable::english(),
            week_start: WeekStart::Sunday,
            theme: Theme::Unstyled,
            styles: String::new(),
            dark_mode: false,
            dark_mode_auto: false,
            icon_prev: None,
            icon_next: None,
            predefined_ranges: Vec::new(),
            clock: Rc::new(SystemClock),
            on_change: None,
            on_render: None,
        }
    }
}

// ── Configuration file ───────────────────────────────────────────────

/// A predefined range as written in a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredefinedRangeConfig {
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Data-only picker configuration, loaded from TOML.
///
/// Every field is optional; unset fields leave the options untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    pub theme: Option<Theme>,
    pub format: Option<String>,
    /// Language tag such as `de-DE`.
    pub locale: Option<String>,
    pub week_start: Option<WeekStart>,
    pub selected_date: Option<String>,
    pub styles: Option<String>,
    pub dark_mode: Option<bool>,
    pub dark_mode_auto: Option<bool>,
    pub input_label: Option<String>,
    pub input_placeholder: Option<String>,
    pub hide_prev_nav: Option<bool>,
    pub hide_next_nav: Option<bool>,
    pub hide_inputs: Option<bool>,
    pub hide_other_month_days: Option<bool>,
    pub predefined_ranges: Vec<PredefinedRangeConfig>,
}

impl PickerConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, PickerError> {
        toml::from_str(content).map_err(|e| PickerError::Config(format!("invalid TOML: {e}")))
    }

    /// Parse a configuration from a TOML file path.
    pub fn from_file(path: &Path) -> Result<Self, PickerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PickerError::Config(format!("config file not found: {}", path.display()))
            } else {
                PickerError::Io(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// Overlay the configured fields onto calendar options.
    pub fn apply(&self, mut options: CalendarOptions) -> CalendarOptions {
        if let Some(theme) = self.theme {
            options.theme = theme;
        }
        if let Some(format) = &self.format {
            options.format = format.clone();
        }
        if let Some(tag) = &self.locale {
            options.locale = LocaleTable::for_tag(tag);
        }
        if let Some(week_start) = self.week_start {
            options.week_start = week_start;
        }
        if let Some(date) = &self.selected_date {
            options.selected_date = Some(InitialDate::Text(date.clone()));
        }
        if let Some(styles) = &self.styles {
            options.styles = styles.clone();
        }
        if let Some(dark) = self.dark_mode {
            options.dark_mode = dark;
        }
        if let Some(auto) = self.dark_mode_auto {
            options.dark_mode_auto = auto;
        }
        if let Some(label) = &self.input_label {
            options.input_label = label.clone();
        }
        if let Some(placeholder) = &self.input_placeholder {
            options.input_placeholder = placeholder.clone();
        }
        if let Some(hide) = self.hide_prev_nav {
            options.hide_prev_nav = hide;
        }
        if let Some(hide) = self.hide_next_nav {
            options.hide_next_nav = hide;
        }
        if let Some(hide) = self.hide_inputs {
            options.hide_inputs = hide;
        }
        if let Some(hide) = self.hide_other_month_days {
            options.hide_other_month_days = hide;
        }
        options
    }

    /// Overlay onto range options. Predefined ranges are parsed with the
    /// resulting pattern and locale.
    pub fn apply_range(&self, mut options: RangeOptions) -> Result<RangeOptions, PickerError> {
        if let Some(theme) = self.theme {
            options.theme = theme;
        }
        if let Some(format) = &self.format {
            options.format = format.clone();
        }
        if let Some(tag) = &self.locale {
            options.locale = LocaleTable::for_tag(tag);
        }
        if let Some(week_start) = self.week_start {
            options.week_start = week_start;
        }
        if let Some(date) = &self.selected_date {
            options.selected_date = Some(InitialDate::Text(date.clone()));
        }
        if let Some(styles) = &self.styles {
            options.styles = styles.clone();
        }
        if let Some(dark) = self.dark_mode {
            options.dark_mode = dark;
        }
        if let Some(auto) = self.dark_mode_auto {
            options.dark_mode_auto = auto;
        }

        let formatter = options.formatter();
        for range in &self.predefined_ranges {
            let invalid = || PickerError::InvalidPredefinedRange {
                label: range.label.clone(),
            };
            let start = formatter.parse(&range.start).map_err(|_| invalid())?;
            let end = formatter.parse(&range.end).map_err(|_| invalid())?;
            options
                .predefined_ranges
                .push(PredefinedRange::fixed(&range.label, start, end));
        }
        Ok(options)
    }
}
