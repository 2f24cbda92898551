//! View filtering: severity masks and free-text search.
//!
//! A [`ViewFilter`] is a pure predicate over [`LogLine`]. The severity and
//! text constraints are independent and combine with logical AND, so the
//! order in which they are applied never changes the result.
//!
//! [`SeverityMask::Sections`] is the one positional mask: whether a line is
//! inside an incident section depends on the lines before it, so
//! [`FilteredView`] applies it while scanning the store in order.

pub mod search;
pub mod view;

pub use search::SearchQuery;
pub use view::{FilteredView, ViewChange};

use crate::model::{LogLine, Severity};
use crate::sections::DEFAULT_CONTEXT_LENGTH;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which severities a view admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityMask {
    /// No severity constraint.
    #[default]
    All,
    /// Error lines only.
    Errors,
    /// Warning lines only.
    Warnings,
    /// Error or Warning lines.
    Flagged,
    /// Members of incident sections: every flagged line and the context
    /// lines after it, each shown once even where sections overlap.
    Sections,
}

impl SeverityMask {
    /// True if a line of `severity` passes the mask.
    ///
    /// [`Sections`](Self::Sections) admits every severity here; its
    /// membership test is positional and lives in [`FilteredView`].
    pub fn admits(self, severity: Severity) -> bool {
        match self {
            SeverityMask::All | SeverityMask::Sections => true,
            SeverityMask::Errors => severity == Severity::Error,
            SeverityMask::Warnings => severity == Severity::Warning,
            SeverityMask::Flagged => severity.is_flagged(),
        }
    }

    /// Name accepted by `FromStr` and the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityMask::All => "all",
            SeverityMask::Errors => "errors",
            SeverityMask::Warnings => "warnings",
            SeverityMask::Flagged => "flagged",
            SeverityMask::Sections => "sections",
        }
    }

    /// True if admission depends on neighbouring lines.
    pub fn is_positional(self) -> bool {
        self == SeverityMask::Sections
    }
}

impl fmt::Display for SeverityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised severity mask name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity filter '{0}' (expected all, errors, warnings, flagged or sections)")]
pub struct InvalidSeverityMask(pub String);

impl FromStr for SeverityMask {
    type Err = InvalidSeverityMask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SeverityMask::All),
            "errors" | "error" => Ok(SeverityMask::Errors),
            "warnings" | "warning" => Ok(SeverityMask::Warnings),
            "flagged" | "errors+warnings" => Ok(SeverityMask::Flagged),
            "sections" | "section" => Ok(SeverityMask::Sections),
            _ => Err(InvalidSeverityMask(s.to_string())),
        }
    }
}

/// Predicate selecting the lines of a view.
///
/// Stateless: evaluating it any number of times has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    severity: SeverityMask,
    search: Option<SearchQuery>,
    /// Section context for [`SeverityMask::Sections`].
    context_length: usize,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            severity: SeverityMask::All,
            search: None,
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }
}

impl ViewFilter {
    /// Build a filter. An empty `search_text` means no text constraint.
    pub fn new(severity: SeverityMask, search_text: &str) -> Self {
        Self {
            severity,
            search: SearchQuery::new(search_text),
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }

    /// Admit every line.
    pub fn all() -> Self {
        Self::default()
    }

    /// Replace the severity mask.
    pub fn with_severity(mut self, severity: SeverityMask) -> Self {
        self.severity = severity;
        self
    }

    /// Replace the search text. Empty clears it.
    pub fn with_search(mut self, search_text: &str) -> Self {
        self.search = SearchQuery::new(search_text);
        self
    }

    /// Replace the number of context lines a section keeps after its anchor.
    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    /// Severity constraint.
    pub fn severity(&self) -> SeverityMask {
        self.severity
    }

    /// Context lines after each anchor under [`SeverityMask::Sections`].
    pub fn context_length(&self) -> usize {
        self.context_length
    }

    /// Search constraint, `None` when unconstrained.
    pub fn search(&self) -> Option<&SearchQuery> {
        self.search.as_ref()
    }

    /// True if this filter admits every line.
    pub fn is_unconstrained(&self) -> bool {
        self.severity == SeverityMask::All && self.search.is_none()
    }

    /// Evaluate both constraints against `line`.
    ///
    /// Under [`SeverityMask::Sections`] only the search text is checked;
    /// see [`FilteredView`] for the section membership.
    pub fn matches(&self, line: &LogLine) -> bool {
        self.severity.admits(line.severity())
            && self
                .search
                .as_ref()
                .is_none_or(|query| query.is_match(line.text()))
    }
}

/// Evaluate `filter` against `line`.
pub fn matches(line: &LogLine, filter: &ViewFilter) -> bool {
    filter.matches(line)
}
