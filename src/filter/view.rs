//! Incrementally maintained filtered view over a [`LogStore`].

use super::ViewFilter;
use crate::model::{LineOrdinal, LogLine, LogStore, StoreId};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// What a call to [`FilteredView::sync`] or [`FilteredView::set_filter`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    /// Row list untouched.
    Unchanged,
    /// Rows were appended; earlier rows kept.
    Appended {
        /// Row index of the first appended row.
        from: usize,
    },
    /// Row list recomputed from scratch.
    Rebuilt,
}

/// Context lines still owed to the most recent flagged line.
#[derive(Debug, Clone, Copy, Default)]
struct SectionCursor {
    remaining: usize,
}

impl SectionCursor {
    /// Advance over `line`, returning whether it belongs to some section.
    fn advance(&mut self, line: &LogLine, context_length: usize) -> bool {
        if line.is_flagged() {
            self.remaining = context_length;
            true
        } else if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}

/// Ordered list of store ordinals admitted by a [`ViewFilter`].
///
/// Rows are strictly increasing ordinals. Appended store lines extend the
/// view without touching existing rows; a filter change or a different
/// store rebuilds it and bumps [`generation`](Self::generation).
///
/// Under [`SeverityMask::Sections`](super::SeverityMask::Sections) the rows are the union of every
/// incident section's members, so overlapping sections share rows.
#[derive(Debug, Clone)]
pub struct FilteredView {
    filter: ViewFilter,
    store_id: Option<StoreId>,
    scanned: usize,
    sections: SectionCursor,
    rows: Vec<LineOrdinal>,
    generation: u64,
}

impl FilteredView {
    /// Empty view; the first [`sync`](Self::sync) populates it.
    pub fn new(filter: ViewFilter) -> Self {
        Self {
            filter,
            store_id: None,
            scanned: 0,
            sections: SectionCursor::default(),
            rows: Vec::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Build a view and populate it from `store`.
    pub fn from_store(store: &LogStore, filter: ViewFilter) -> Self {
        let mut view = Self::new(filter);
        view.sync(store);
        view
    }

    /// Current filter.
    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    /// Token that changes whenever existing rows may have changed.
    ///
    /// Unique across all views, so a layout keyed on it never confuses two views.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store the rows were derived from.
    pub fn store_id(&self) -> Option<StoreId> {
        self.store_id
    }

    /// Admitted ordinals, strictly increasing.
    pub fn rows(&self) -> &[LineOrdinal] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Store ordinal shown at view row `row`.
    pub fn get(&self, row: usize) -> Option<LineOrdinal> {
        self.rows.get(row).copied()
    }

    /// The line shown at view row `row`.
    pub fn line<'s>(&self, row: usize, store: &'s LogStore) -> Option<&'s LogLine> {
        self.get(row).and_then(|ordinal| store.get(ordinal))
    }

    /// View row showing `ordinal`, if the filter admits it.
    pub fn position_of(&self, ordinal: LineOrdinal) -> Option<usize> {
        self.rows.binary_search(&ordinal).ok()
    }

    /// Replace the filter. Rebuilds unless nothing changed.
    pub fn set_filter(&mut self, filter: ViewFilter, store: &LogStore) -> ViewChange {
        if filter == self.filter && self.store_id == Some(store.id()) {
            return self.sync(store);
        }
        self.filter = filter;
        self.rebuild(store);
        ViewChange::Rebuilt
    }

    /// Catch up with lines appended to `store` since the last call.
    pub fn sync(&mut self, store: &LogStore) -> ViewChange {
        if self.store_id != Some(store.id()) {
            self.rebuild(store);
            return ViewChange::Rebuilt;
        }

        let from = self.rows.len();
        self.scan(store);
        if self.rows.len() > from {
            ViewChange::Appended { from }
        } else {
            ViewChange::Unchanged
        }
    }

    fn rebuild(&mut self, store: &LogStore) {
        self.store_id = Some(store.id());
        self.scanned = 0;
        self.sections = SectionCursor::default();
        self.rows.clear();
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        self.scan(store);
        debug!(
            rows = self.rows.len(),
            lines = store.len(),
            severity = %self.filter.severity(),
            "Filtered view rebuilt"
        );
    }

    fn scan(&mut self, store: &LogStore) {
        let positional = self.filter.severity().is_positional();
        let context_length = self.filter.context_length();
        for line in store.tail(self.scanned) {
            // The cursor sees every line, matched or not.
            let in_scope = !positional || self.sections.advance(line, context_length);
            if in_scope && self.filter.matches(line) {
                self.rows.push(line.ordinal());
            }
        }
        self.scanned = store.len();
    }
}
