//! Windowed layout over a filtered view.
//!
//! Holds one height per view row in a [`HeightIndex`] and answers
//! visible-range queries in O(log² n). Rows are only measured when they
//! enter the view; nothing is rendered here.

use super::height::HeightParams;
use super::height_index::HeightIndex;
use super::visible_range::VisibleRange;
use crate::filter::FilteredView;
use crate::model::LogStore;
use tracing::debug;

/// Row heights and cumulative offsets for the current [`FilteredView`].
///
/// Rebuilt when the view's generation or the height parameters change;
/// extended in place when the view only grew at the tail.
#[derive(Debug, Clone, Default)]
pub struct WindowedLayout {
    params: HeightParams,
    index: HeightIndex,
    view_generation: Option<u64>,
}

impl WindowedLayout {
    /// Empty layout; rows are measured on [`sync`](Self::sync).
    pub fn new(params: HeightParams) -> Self {
        Self {
            params,
            index: HeightIndex::default(),
            view_generation: None,
        }
    }

    /// Build a layout for `view` in one step.
    pub fn from_view(view: &FilteredView, store: &LogStore, params: HeightParams) -> Self {
        let mut layout = Self::new(params);
        layout.sync(view, store);
        layout
    }

    /// Current height function.
    pub fn params(&self) -> HeightParams {
        self.params
    }

    /// Change the height function. Invalidates every row.
    pub fn set_params(&mut self, params: HeightParams, view: &FilteredView, store: &LogStore) {
        if params != self.params {
            self.params = params;
            self.rebuild(view, store);
        }
    }

    /// Bring the layout in line with `view`.
    ///
    /// Returns the number of rows measured.
    pub fn sync(&mut self, view: &FilteredView, store: &LogStore) -> usize {
        if self.view_generation != Some(view.generation()) || self.index.len() > view.len() {
            return self.rebuild(view, store);
        }
        let from = self.index.len();
        self.append(view, store, from);
        view.len() - from
    }

    fn rebuild(&mut self, view: &FilteredView, store: &LogStore) -> usize {
        self.index.clear();
        self.view_generation = Some(view.generation());
        self.append(view, store, 0);
        debug!(
            rows = self.index.len(),
            total_height = self.index.total(),
            "Layout rebuilt"
        );
        self.index.len()
    }

    fn append(&mut self, view: &FilteredView, store: &LogStore, from: usize) {
        for &ordinal in view.rows().get(from..).unwrap_or(&[]) {
            // A row missing from the store means the view is stale; measure it
            // as empty and let the next rebuild correct it.
            let text = store.get(ordinal).map(|line| line.text()).unwrap_or("");
            self.index.push(self.params.row_height(text));
        }
    }

    /// Number of rows laid out.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Sum of every row height, for scrollbar sizing.
    pub fn total_height(&self) -> usize {
        self.index.total()
    }

    /// Top edge of `row`, or `None` past the end.
    pub fn offset_of(&self, row: usize) -> Option<usize> {
        (row < self.len()).then(|| self.index.offset_of(row))
    }

    /// Height of `row`, or `None` past the end.
    pub fn height_of(&self, row: usize) -> Option<usize> {
        self.index.height(row)
    }

    /// Row covering pixel `offset`, or `None` at or past the total height.
    pub fn row_at(&self, offset: usize) -> Option<usize> {
        self.index.lower_bound(offset)
    }

    /// Rows intersecting `[scroll, scroll + viewport)`.
    ///
    /// A zero viewport yields the row at `scroll`. Scroll offsets at or past
    /// the end clamp to the last pixel row. `None` for an empty layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::filter::{FilteredView, ViewFilter};
    /// # use logsift::model::LogStore;
    /// # use logsift::view_state::{HeightParams, WindowedLayout};
    /// let store = LogStore::from_lines(["a", "b", "c", "d"]);
    /// let view = FilteredView::from_store(&store, ViewFilter::all());
    /// let layout = WindowedLayout::from_view(&view, &store, HeightParams::new(10, 10, 80));
    ///
    /// let range = layout.visible_range(15, 20).unwrap();
    /// assert_eq!((range.first, range.last), (1, 3));
    /// assert_eq!(layout.total_height(), 40);
    /// ```
    pub fn visible_range(&self, scroll: usize, viewport: usize) -> Option<VisibleRange> {
        let total = self.total_height();
        if total == 0 {
            return None;
        }
        let scroll = scroll.min(total - 1);
        let first = self.index.lower_bound(scroll)?;
        let last = match viewport {
            0 => first,
            _ => {
                let bottom = scroll.saturating_add(viewport - 1).min(total - 1);
                self.index.lower_bound(bottom)?
            }
        };
        Some(VisibleRange::new(first, last, scroll, viewport))
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
