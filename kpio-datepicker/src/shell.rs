//! Calendar shell
//!
//! The static part of a calendar: stylesheet, root and the empty regions the
//! widget fills in (header, inputs, errors, weekday header, day grid).
//!
//! ```text
//! div.datepicker
//! ├── style
//! └── div.datepicker__calendar[.dark]
//!     ├── div.datepicker__calendar_header
//!     ├── div.datepicker__calendar_inputs
//!     ├── div.datepicker__calendar_errors
//!     └── div.datepicker__calendar_days-wrap
//!         ├── div.datepicker__calendar_days-header
//!         └── div.datepicker__calendar_days
//! ```

use kpio_dom::{Document, NodeId};

use crate::error::PickerError;
use crate::theme::{self, Theme};

pub const HOST_CLASS: &str = "datepicker";
pub const CALENDAR_CLASS: &str = "datepicker__calendar";
pub const HEADER_CLASS: &str = "datepicker__calendar_header";
pub const INPUTS_CLASS: &str = "datepicker__calendar_inputs";
pub const ERRORS_CLASS: &str = "datepicker__calendar_errors";
pub const DAYS_WRAP_CLASS: &str = "datepicker__calendar_days-wrap";
pub const WEEKDAYS_CLASS: &str = "datepicker__calendar_days-header";
pub const DAYS_CLASS: &str = "datepicker__calendar_days";
pub const DAY_CLASS: &str = "datepicker__calendar_day";
pub const DAY_HEADER_CLASS: &str = "datepicker__calendar_day-header";
pub const DARK_CLASS: &str = "dark";

/// Where a widget attaches itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountTarget {
    /// First element matching a selector, searched from the document root.
    Selector(String),
    /// A node already in the document.
    Node(NodeId),
}

impl From<&str> for MountTarget {
    fn from(selector: &str) -> Self {
        MountTarget::Selector(selector.into())
    }
}

impl From<NodeId> for MountTarget {
    fn from(node: NodeId) -> Self {
        MountTarget::Node(node)
    }
}

/// Inputs for one shell.
#[derive(Debug, Clone, Default)]
pub struct ShellSpec {
    pub theme: Theme,
    pub custom_css: String,
    /// Start with the `dark` class set.
    pub dark_mode: bool,
    /// Emit the dark-mode rules even when starting light.
    pub dark_capable: bool,
    /// Weekday labels in grid order.
    pub weekday_labels: Vec<String>,
}

impl ShellSpec {
    pub fn new(theme: Theme, custom_css: &str, dark_mode: bool) -> Self {
        ShellSpec {
            theme,
            custom_css: custom_css.into(),
            dark_mode,
            dark_capable: dark_mode,
            weekday_labels: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                .iter()
                .map(|s| String::from(*s))
                .collect(),
        }
    }
}

/// Nodes of a rendered shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellHandles {
    /// Outermost node; this is what gets mounted.
    pub host: NodeId,
    pub style: NodeId,
    /// The element carrying the `dark` class.
    pub calendar: NodeId,
    pub header: NodeId,
    pub inputs: NodeId,
    pub errors: NodeId,
    pub weekdays: NodeId,
    pub days: NodeId,
}

fn div(doc: &mut Document, parent: NodeId, class: &str) -> NodeId {
    let node = doc.create_element("div");
    doc.add_class(node, class);
    doc.append_child(parent, node);
    node
}

/// Build a detached shell and return handles to its regions.
pub fn render_calendar_shell(doc: &mut Document, spec: &ShellSpec) -> ShellHandles {
    let host = doc.create_element("div");
    doc.add_class(host, HOST_CLASS);

    let style = doc.create_element("style");
    let css = theme::compose(spec.theme, &spec.custom_css, spec.dark_mode || spec.dark_capable);
    doc.append_text(style, &css);
    doc.append_child(host, style);

    let calendar = div(doc, host, CALENDAR_CLASS);
    if spec.dark_mode {
        doc.add_class(calendar, DARK_CLASS);
    }
    let header = div(doc, calendar, HEADER_CLASS);
    let inputs = div(doc, calendar, INPUTS_CLASS);
    let errors = div(doc, calendar, ERRORS_CLASS);
    let days_wrap = div(doc, calendar, DAYS_WRAP_CLASS);
    let weekdays = div(doc, days_wrap, WEEKDAYS_CLASS);
    for label in &spec.weekday_labels {
        let cell = div(doc, weekdays, DAY_CLASS);
        doc.add_class(cell, DAY_HEADER_CLASS);
        doc.append_text(cell, label);
    }
    let days = div(doc, days_wrap, DAYS_CLASS);

    ShellHandles {
        host,
        style,
        calendar,
        header,
        inputs,
        errors,
        weekdays,
        days,
    }
}

/// Markup of an empty shell.
pub fn calendar_shell_markup(theme: Theme, custom_css: &str, dark_mode: bool) -> String {
    let mut doc = Document::new();
    let handles = render_calendar_shell(&mut doc, &ShellSpec::new(theme, custom_css, dark_mode));
    doc.outer_html(handles.host)
}

/// Resolve a mount target to an attached element.
pub fn resolve(doc: &Document, target: &MountTarget) -> Result<NodeId, PickerError> {
    match target {
        MountTarget::Selector(selector) => doc
            .query_selector(doc.root(), selector)
            .ok_or_else(|| PickerError::MountTargetNotFound {
                selector: selector.clone(),
            }),
        MountTarget::Node(node) => {
            let attached = doc.get(*node).map(|n| n.is_element()).unwrap_or(false)
                && doc.is_connected(*node);
            if attached {
                Ok(*node)
            } else {
                Err(PickerError::MountTargetMissing { node: *node })
            }
        }
    }
}
