//! Append-only line store owned by one ingestion run.

use super::line::{LineOrdinal, LogLine};
use super::severity::{Classifier, Severity};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a store instance.
///
/// Derived views remember the id they were built from, so a wholesale
/// replacement of the store is detected without manual bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        Self(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Ingestion still appending.
    Loading,
    /// End of stream reached; frozen.
    Complete,
    /// Stream or decoding failed part way; lines so far are valid.
    Incomplete,
    /// Superseded or cancelled before end of stream.
    Cancelled,
}

/// Ordered, append-only sequence of classified lines.
///
/// Exactly one writer (the ingestion run) appends; readers only traverse
/// the prefix `[0, len())` observed when they start. Lines are never
/// mutated or removed once appended.
#[derive(Debug, Clone)]
pub struct LogStore {
    id: StoreId,
    lines: Vec<LogLine>,
    state: LoadState,
}

impl LogStore {
    /// Create an empty store in the `Loading` state.
    pub fn new() -> Self {
        Self {
            id: StoreId::next(),
            lines: Vec::new(),
            state: LoadState::Loading,
        }
    }

    /// Build a complete store from already split lines, classifying each.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::model::{LogStore, Severity};
    /// let store = LogStore::from_lines(["INFO up", "Error: down"]);
    /// assert_eq!(store.len(), 2);
    /// assert_eq!(store.lines()[1].severity(), Severity::Error);
    /// assert!(store.is_frozen());
    /// ```
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classifier = Classifier::default();
        let mut store = Self::new();
        for line in lines {
            let text = line.into();
            let severity = classifier.classify(&text);
            store.push_line(text, severity);
        }
        store.freeze();
        store
    }

    /// Identity of this store; never shared with another store.
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Where ingestion of this store got to.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True once ingestion signalled completion.
    pub fn is_frozen(&self) -> bool {
        self.state == LoadState::Complete
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `ordinal`, if appended yet.
    pub fn get(&self, ordinal: LineOrdinal) -> Option<&LogLine> {
        self.lines.get(ordinal.get())
    }

    /// Every line appended so far, in ordinal order.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines appended at or after `from`.
    pub fn tail(&self, from: usize) -> &[LogLine] {
        self.lines.get(from..).unwrap_or(&[])
    }

    /// Count of lines with each flagged severity: (errors, warnings).
    pub fn flagged_counts(&self) -> (usize, usize) {
        self.lines
            .iter()
            .fold((0, 0), |(errors, warnings), line| match line.severity() {
                Severity::Error => (errors + 1, warnings),
                Severity::Warning => (errors, warnings + 1),
                Severity::None => (errors, warnings),
            })
    }

    /// Append a classified line, assigning the next ordinal.
    pub(crate) fn push_line(&mut self, text: String, severity: Severity) -> LineOrdinal {
        debug_assert_eq!(
            self.state,
            LoadState::Loading,
            "append to a store that is no longer loading"
        );
        let ordinal = LineOrdinal::new(self.lines.len());
        self.lines.push(LogLine::new(ordinal, text, severity));
        ordinal
    }

    pub(crate) fn freeze(&mut self) {
        self.state = LoadState::Complete;
    }

    pub(crate) fn mark_incomplete(&mut self) {
        self.state = LoadState::Incomplete;
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.state = LoadState::Cancelled;
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
