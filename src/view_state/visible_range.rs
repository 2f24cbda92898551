//! Visible range calculation result

use serde::Serialize;
use std::ops::RangeInclusive;

/// Rows intersecting the viewport.
///
/// # Invariants
/// - `first <= last`
/// - `last < row count` of the layout that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRange {
    /// Index of first visible row (inclusive).
    pub first: usize,
    /// Index of last visible row (inclusive).
    pub last: usize,
    /// Scroll offset after clamping to the content.
    pub scroll_offset: usize,
    /// Viewport height the range was computed for.
    pub viewport_height: usize,
}

impl VisibleRange {
    /// # Panics
    /// In debug builds, panics if `first > last`.
    pub fn new(first: usize, last: usize, scroll_offset: usize, viewport_height: usize) -> Self {
        debug_assert!(first <= last, "first {} > last {}", first, last);
        Self {
            first,
            last,
            scroll_offset,
            viewport_height,
        }
    }

    /// Number of visible rows. Always at least one.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Every row index in the range.
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// True if `row` is inside the range.
    pub fn contains(&self, row: usize) -> bool {
        self.indices().contains(&row)
    }
}
