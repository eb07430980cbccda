//! Theme stylesheets
//!
//! Two built-in themes: `unstyled` (layout only, always emitted) and
//! `lite-purple` layered on top. Every rule targets the `datepicker__` class
//! namespace so pickers can share a page with other widgets.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Unstyled,
    LitePurple,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Unstyled => "unstyled",
            Theme::LitePurple => "lite-purple",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unstyled" => Ok(Theme::Unstyled),
            "lite-purple" | "lite_purple" | "litepurple" => Ok(Theme::LitePurple),
            other => Err(format!("unknown theme {:?}", other)),
        }
    }
}

const BASE: &str = r#"
.datepicker__calendar {
  font-family: sans-serif;
  width: 100%;
  max-width: 240px;
  padding: 14px;
  box-sizing: border-box;
  position: relative;
  background: #fff;
  box-shadow: 0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1);
}
.datepicker__calendar_header { display: flex; align-items: center; width: 100%; }
.datepicker__calendar_prev, .datepicker__calendar_next {
  display: flex;
  align-items: center;
  justify-content: center;
  width: 16px;
  height: 16px;
  padding: 0;
  border: none;
  background: none;
  color: #2d3436;
  cursor: pointer;
}
.datepicker__calendar_prev svg, .datepicker__calendar_next svg { width: 16px; height: 16px; }
.datepicker__calendar_title {
  flex-grow: 1;
  text-align: center;
  font-weight: 600;
  font-size: 0.875rem;
  color: #2d3436;
}
.datepicker__calendar_inputs { margin-top: 12px; }
.datepicker__calendar_inputs label { display: block; text-align: left; }
.datepicker__calendar_inputs-wrap { display: flex; }
.datepicker__calendar_inputs input { width: 100%; }
.datepicker__calendar_inputs input.error { border: 2px solid #d63031; }
.datepicker__calendar_errors { margin: 8px 0; color: #d63031; }
.datepicker__calendar_days, .datepicker__calendar_days-header {
  display: grid;
  grid-template-columns: repeat(7, 1fr);
  margin-top: 12px;
  text-align: center;
}
.datepicker__calendar_day { display: block; width: 100%; height: 100%; }
.datepicker__calendar_day button { display: block; width: 100%; height: 100%; cursor: pointer; }
.datepicker__calendar_day.disabled button { cursor: default; }
.datepicker__calendar_day.active button { background: blue; color: white; }
.datepicker__calendar_day.highlight button { background: #236bb9; color: white; }
"#;

const BASE_DARK: &str = r#"
.datepicker__calendar.dark { background: #1a1a1a; box-shadow: none; }
.dark .datepicker__calendar_prev, .dark .datepicker__calendar_next,
.dark .datepicker__calendar_title, .dark .datepicker__calendar_inputs label,
.dark .datepicker__calendar_days-header { color: #fff; }
.dark .datepicker__calendar_prev svg, .dark .datepicker__calendar_next svg { stroke: #fff; }
"#;

const LITE_PURPLE: &str = r#"
.datepicker__calendar { border-radius: 8px; }
.datepicker__calendar_title { font-size: 12px; }
.datepicker__calendar_inputs input, .datepicker__calendar_inputs button {
  font-size: 12px;
  font-weight: 500;
  border: 1px solid #e9e8ec;
  border-radius: 4px;
  background: white;
}
.datepicker__calendar_inputs input { flex-grow: 1; margin-right: 8px; padding: 4px 4px 4px 8px; }
.datepicker__calendar_inputs button { padding: 6px 12px; cursor: pointer; }
.datepicker__calendar_errors { font-size: 12px; font-weight: bold; }
.datepicker__calendar_day-header { font-size: 12px; }
.datepicker__calendar_days { margin-top: 8px; }
.datepicker__calendar_days .datepicker__calendar_day { position: relative; margin: 2px; }
.datepicker__calendar_days .datepicker__calendar_day button {
  display: flex;
  justify-content: center;
  align-items: center;
  padding: 5px;
  border: none;
  background: transparent;
  font-size: 12px;
  font-weight: bold;
  color: black;
}
.datepicker__calendar_days .datepicker__calendar_day.disabled button { color: #767676; font-weight: normal; }
.datepicker__calendar_days .datepicker__calendar_day.highlight { background: #bfa9f3; }
.datepicker__calendar_days .datepicker__calendar_day.active { background: #7d56da; border-radius: 2px; }
.datepicker__calendar_days .datepicker__calendar_day.active button { color: #fff; }
"#;

const LITE_PURPLE_DARK: &str = r#"
.dark .datepicker__calendar_inputs input, .dark .datepicker__calendar_inputs button {
  background: #2d3748;
  border: 1px solid #4a5568;
  color: #fff;
}
.dark .datepicker__calendar_days .datepicker__calendar_day button { color: #ecf0f1; }
.dark .datepicker__calendar_days .datepicker__calendar_day.disabled button { color: #555; }
"#;

const TOGGLE: &str = r#"
.datepicker__toggle { position: relative; }
.datepicker__toggle_calendar { display: none; position: absolute; top: 100%; left: 0; }
.datepicker__toggle_calendar.active { display: block; }
"#;

const TOGGLE_LITE_PURPLE: &str = r#"
.datepicker__toggle_input input {
  display: block;
  padding: 4px 4px 4px 8px;
  font-size: 12px;
  font-weight: 500;
  border: 1px solid #e9e8ec;
  border-radius: 4px;
  background: white;
}
.datepicker__toggle.dark .datepicker__toggle_input input {
  background: #2d3748;
  border: 1px solid #4a5568;
  color: #fff;
}
"#;

const RANGE: &str = r#"
.datepicker__range {
  display: inline-flex;
  box-shadow: 0 10px 15px -3px rgb(0 0 0 / 10%), 0 4px 6px -4px rgb(0 0 0 / 10%);
}
.datepicker__range.dark { background: #2c3e50; }
.datepicker__range_predefined { display: flex; flex-direction: column; padding: 14px 0; }
.datepicker__range_predefined button { border: none; background: none; text-align: left; cursor: pointer; }
.datepicker__range .datepicker__calendar { box-shadow: none; }
"#;

/// Calendar stylesheet for `theme`.
///
/// `dark_mode` adds the rules behind the `dark` class; pass `true` for
/// widgets that can switch to dark at runtime.
pub fn stylesheet(theme: Theme, dark_mode: bool) -> String {
    let mut css = String::from(BASE);
    if dark_mode {
        css.push_str(BASE_DARK);
    }
    if theme == Theme::LitePurple {
        css.push_str(LITE_PURPLE);
        if dark_mode {
            css.push_str(LITE_PURPLE_DARK);
        }
    }
    css
}

/// Theme stylesheet followed by caller overrides, so overrides win.
pub fn compose(theme: Theme, custom_css: &str, dark_mode: bool) -> String {
    let mut css = stylesheet(theme, dark_mode);
    if !custom_css.trim().is_empty() {
        css.push('\n');
        css.push_str(custom_css);
        css.push('\n');
    }
    css
}

/// Rules for the toggle wrapper. Caller overrides go to the inner calendar.
pub fn toggle_stylesheet(theme: Theme) -> String {
    let mut css = String::from(TOGGLE);
    if theme == Theme::LitePurple {
        css.push_str(TOGGLE_LITE_PURPLE);
    }
    css
}

/// Rules for the range wrapper and its sidebar.
pub fn range_stylesheet() -> String {
    String::from(RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names() {
        assert_eq!("lite-purple".parse::<Theme>(), Ok(Theme::LitePurple));
        assert_eq!(" Unstyled ".parse::<Theme>(), Ok(Theme::Unstyled));
        assert!("neon".parse::<Theme>().is_err());
        assert_eq!(Theme::LitePurple.to_string(), "lite-purple");
    }

    #[test]
    fn test_layering() {
        let plain = stylesheet(Theme::Unstyled, false);
        assert!(plain.contains(".datepicker__calendar_days"));
        assert!(!plain.contains("#7d56da"));
        assert!(!plain.contains(".datepicker__calendar.dark"));

        let purple = stylesheet(Theme::LitePurple, true);
        assert!(purple.starts_with(BASE));
        assert!(purple.contains("#7d56da"));
        assert!(purple.contains(".datepicker__calendar.dark"));
    }

    #[test]
    fn test_overrides_come_last() {
        let css = compose(Theme::Unstyled, ".x { color: red }", false);
        assert!(css.trim_end().ends_with(".x { color: red }"));
        assert_eq!(compose(Theme::Unstyled, "  ", false), stylesheet(Theme::Unstyled, false));
    }
}
