//! Incident sections: a flagged line plus a bounded run of following lines.
//!
//! Sections are never merged. Two flagged lines within `context_length` of
//! each other produce two overlapping sections, each with its own members.
//! This keeps grouping local: a section depends only on its anchor and the
//! lines after it, so it can be extended as lines are appended without
//! revisiting earlier sections.

use crate::model::{LineOrdinal, LogStore, Severity, StoreId};
use serde::Serialize;
use tracing::debug;

/// Default number of context lines following an anchor.
pub const DEFAULT_CONTEXT_LENGTH: usize = 2;

/// Rotating accent colors, assigned by section index.
pub const SECTION_PALETTE: [&str; 4] = ["#ffcccc", "#ffeb99", "#cce5ff", "#d9ccff"];

/// A flagged line and up to `context_length` lines after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentSection {
    index: usize,
    anchor: LineOrdinal,
    severity: Severity,
    members: Vec<LineOrdinal>,
}

impl IncidentSection {
    /// Position of this section in grouping order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Ordinal of the flagged line that opened the section.
    pub fn anchor(&self) -> LineOrdinal {
        self.anchor
    }

    /// Severity of the anchor line.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Anchor followed by its context lines, in store order.
    pub fn members(&self) -> &[LineOrdinal] {
        &self.members
    }

    /// Number of member lines.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `ordinal` is one of the members.
    pub fn contains(&self, ordinal: LineOrdinal) -> bool {
        // members are contiguous, starting at the anchor
        ordinal >= self.anchor && ordinal.get() < self.anchor.get() + self.members.len()
    }

    /// Accent color from the rotating palette.
    pub fn accent_color(&self) -> &'static str {
        SECTION_PALETTE[self.index % SECTION_PALETTE.len()]
    }
}

/// Group every flagged line of `store` into a section, in store order.
///
/// Each section holds the anchor and the next `context_length` lines present
/// in the store, fewer near the end.
///
/// # Examples
///
/// ```
/// # use logsift::model::LogStore;
/// # use logsift::sections::group_sections;
/// let store = LogStore::from_lines(["A", "Error1", "B", "C", "Error2", "D"]);
/// let sections = group_sections(&store, 2);
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].len(), 3);
/// assert_eq!(sections[1].len(), 2);
/// ```
pub fn group_sections(store: &LogStore, context_length: usize) -> Vec<IncidentSection> {
    let len = store.len();
    store
        .lines()
        .iter()
        .filter(|line| line.is_flagged())
        .enumerate()
        .map(|(index, line)| {
            let start = line.ordinal().get();
            let end = start.saturating_add(context_length).saturating_add(1).min(len);
            IncidentSection {
                index,
                anchor: line.ordinal(),
                severity: line.severity(),
                members: (start..end).map(LineOrdinal::new).collect(),
            }
        })
        .collect()
}

/// Incremental grouper that extends sections as the store grows.
///
/// Produces exactly what [`group_sections`] would for the current store.
/// A different store (by id) resets the grouper.
#[derive(Debug, Clone)]
pub struct SectionGrouper {
    context_length: usize,
    store_id: Option<StoreId>,
    scanned: usize,
    /// Sections before this index are full and never change again.
    open_from: usize,
    sections: Vec<IncidentSection>,
}

impl SectionGrouper {
    /// Grouper with no store attached yet.
    pub fn new(context_length: usize) -> Self {
        Self {
            context_length,
            store_id: None,
            scanned: 0,
            open_from: 0,
            sections: Vec::new(),
        }
    }

    /// Context lines following each anchor.
    pub fn context_length(&self) -> usize {
        self.context_length
    }

    /// Sections found so far, in anchor order.
    pub fn sections(&self) -> &[IncidentSection] {
        &self.sections
    }

    /// Consume the grouper, keeping its sections.
    pub fn into_sections(self) -> Vec<IncidentSection> {
        self.sections
    }

    /// Catch up with `store`, returning the number of new sections.
    pub fn sync(&mut self, store: &LogStore) -> usize {
        if self.store_id != Some(store.id()) {
            self.reset(store.id());
        }

        let before = self.sections.len();
        let capacity = self.context_length.saturating_add(1);
        for line in store.tail(self.scanned) {
            for section in &mut self.sections[self.open_from..] {
                if section.members.len() < capacity {
                    section.members.push(line.ordinal());
                }
            }
            while self
                .sections
                .get(self.open_from)
                .is_some_and(|s| s.members.len() >= capacity)
            {
                self.open_from += 1;
            }

            if line.is_flagged() {
                let index = self.sections.len();
                self.sections.push(IncidentSection {
                    index,
                    anchor: line.ordinal(),
                    severity: line.severity(),
                    members: vec![line.ordinal()],
                });
            }
        }
        self.scanned = store.len();

        let added = self.sections.len() - before;
        if added > 0 {
            debug!(added, total = self.sections.len(), "Incident sections extended");
        }
        added
    }

    fn reset(&mut self, store_id: StoreId) {
        self.store_id = Some(store_id);
        self.scanned = 0;
        self.open_from = 0;
        self.sections.clear();
    }
}

impl Default for SectionGrouper {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_LENGTH)
    }
}
