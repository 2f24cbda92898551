//! Severity classification.
//!
//! A line's severity depends on its own text only. Error dominates Warning:
//! the first marker found in priority order wins, regardless of counts.

use serde::Serialize;
use std::fmt;

/// Default marker for error lines (case-sensitive literal).
pub const ERROR_MARKER: &str = "Error";

/// Default marker for warning lines (case-sensitive literal).
pub const WARNING_MARKER: &str = "Warning";

/// Severity of a single log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neither marker present.
    #[default]
    None,
    /// Warning marker present, no Error marker.
    Warning,
    /// Error marker present.
    Error,
}

impl Severity {
    /// True for Warning and Error.
    pub fn is_flagged(self) -> bool {
        !matches!(self, Severity::None)
    }

    /// Background color tag carried into exported documents.
    ///
    /// Unflagged lines have no tag.
    pub fn color_tag(self) -> Option<&'static str> {
        match self {
            Severity::None => None,
            Severity::Warning => Some("#ffeb99"),
            Severity::Error => Some("#ffcccc"),
        }
    }

    /// Short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marker-based line classifier.
///
/// Markers are matched as literal, case-sensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    error_marker: String,
    warning_marker: String,
}

impl Classifier {
    /// Classifier with custom marker literals.
    pub fn new(error_marker: impl Into<String>, warning_marker: impl Into<String>) -> Self {
        Self {
            error_marker: error_marker.into(),
            warning_marker: warning_marker.into(),
        }
    }

    /// Error if the error marker occurs, else Warning if the warning marker occurs, else None.
    pub fn classify(&self, text: &str) -> Severity {
        classify_with(text, &self.error_marker, &self.warning_marker)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ERROR_MARKER, WARNING_MARKER)
    }
}

/// Classify with the default markers.
pub fn classify(text: &str) -> Severity {
    classify_with(text, ERROR_MARKER, WARNING_MARKER)
}

fn classify_with(text: &str, error_marker: &str, warning_marker: &str) -> Severity {
    if text.contains(error_marker) {
        Severity::Error
    } else if text.contains(warning_marker) {
        Severity::Warning
    } else {
        Severity::None
    }
}
