//! Classified log line and its stable ordinal.

use super::severity::Severity;
use serde::Serialize;
use std::fmt;

/// Position of a line in the original file. 0-indexed internally, 1-based for display.
///
/// The ordinal is the sole identity of a [`LogLine`]. It is assigned once at
/// append time and survives filtering and grouping unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct LineOrdinal(usize);

impl LineOrdinal {
    /// Create a new LineOrdinal from a raw 0-based value.
    pub fn new(ordinal: usize) -> Self {
        Self(ordinal)
    }

    /// Get the raw 0-based value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Get the 1-based line number for display purposes.
    pub fn display(&self) -> usize {
        self.0 + 1
    }

    /// Get the next ordinal.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for LineOrdinal {
    fn from(ordinal: usize) -> Self {
        Self(ordinal)
    }
}

impl fmt::Display for LineOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A single classified line of the ingested file.
///
/// Immutable once created: the text never changes and the severity is
/// computed exactly once, when the line is appended to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    ordinal: LineOrdinal,
    text: String,
    severity: Severity,
}

impl LogLine {
    /// Create a line. Only the store assigns ordinals.
    pub(crate) fn new(ordinal: LineOrdinal, text: String, severity: Severity) -> Self {
        Self {
            ordinal,
            text,
            severity,
        }
    }

    /// Position in the original input.
    pub fn ordinal(&self) -> LineOrdinal {
        self.ordinal
    }

    /// Line text without the trailing newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Severity assigned when the line was appended.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// True for lines carrying a Warning or Error marker.
    pub fn is_flagged(&self) -> bool {
        self.severity.is_flagged()
    }
}
