use kpio_calendar::ParseError;
use kpio_dom::NodeId;

/// Errors produced while building or configuring a picker.
///
/// Every variant is a construction-time failure: the widget is not created
/// and nothing is left mounted. Bad text typed by the user is never an `Err`,
/// it becomes an [`ErrorEntry`](crate::calendar::ErrorEntry) instead.
#[derive(thiserror::Error, Debug)]
pub enum PickerError {
    #[error("Mount target not found: {selector}")]
    MountTargetNotFound { selector: String },

    #[error("Mount target node {node} is not attached to the document")]
    MountTargetMissing { node: NodeId },

    #[error("Invalid initial date {value:?}: {reason}")]
    InvalidInitialDate { value: String, reason: ParseError },

    #[error("Invalid predefined range: {label}")]
    InvalidPredefinedRange { label: String },

    #[error("No predefined range at index {index}")]
    UnknownPredefinedRange { index: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PickerError {
    /// Log at `error` under `component`'s prefix and hand the error back.
    pub(crate) fn logged(self, component: &str) -> Self {
        log::error!("[KPIO {}] {}", component, self);
        self
    }
}
