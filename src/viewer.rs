//! Store-driven composition of the filtered view, incident sections and
//! windowed layout, as consumed by a renderer.

use crate::filter::{FilteredView, ViewChange, ViewFilter};
use crate::model::{LineOrdinal, LogLine, LogStore};
use crate::sections::{IncidentSection, SectionGrouper};
use crate::view_state::{HeightParams, VisibleRange, WindowedLayout};
use serde::Serialize;

/// One row a renderer must draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRow<'s> {
    /// Index into the filtered view.
    pub row: usize,
    /// The line to draw.
    pub line: &'s LogLine,
    /// Top edge in view coordinates.
    pub top: usize,
    /// Row height in pixels.
    pub height: usize,
}

/// Derived state for one store: filtered rows, their layout and the
/// incident sections.
///
/// Holds no lines itself. Call [`sync`](Self::sync) whenever the store grew
/// or was replaced; everything is recomputed from the store and filter.
#[derive(Debug, Clone)]
pub struct Viewer {
    view: FilteredView,
    grouper: SectionGrouper,
    layout: WindowedLayout,
}

impl Viewer {
    /// Viewer with nothing synced yet.
    ///
    /// `context_length` sizes the incident sections and, under
    /// [`SeverityMask::Sections`](crate::filter::SeverityMask::Sections),
    /// the filtered rows; it overrides the filter's own context length.
    pub fn new(filter: ViewFilter, params: HeightParams, context_length: usize) -> Self {
        Self {
            view: FilteredView::new(filter.with_context_length(context_length)),
            grouper: SectionGrouper::new(context_length),
            layout: WindowedLayout::new(params),
        }
    }

    /// Catch up with `store`: appended lines extend the view in place, a
    /// different store rebuilds everything.
    pub fn sync(&mut self, store: &LogStore) -> ViewChange {
        let change = self.view.sync(store);
        self.grouper.sync(store);
        self.layout.sync(&self.view, store);
        change
    }

    /// Swap the filter and relayout the rows it admits.
    pub fn set_filter(&mut self, filter: ViewFilter, store: &LogStore) -> ViewChange {
        let filter = filter.with_context_length(self.grouper.context_length());
        let change = self.view.set_filter(filter, store);
        self.grouper.sync(store);
        self.layout.sync(&self.view, store);
        change
    }

    /// Change the row height function and relayout every row.
    pub fn set_height_params(&mut self, params: HeightParams, store: &LogStore) {
        self.layout.set_params(params, &self.view, store);
    }

    /// Current filter.
    pub fn filter(&self) -> &ViewFilter {
        self.view.filter()
    }

    /// Filtered rows.
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Row geometry for the filtered rows.
    pub fn layout(&self) -> &WindowedLayout {
        &self.layout
    }

    /// Incident sections of the whole store, regardless of the filter.
    pub fn sections(&self) -> &[IncidentSection] {
        self.grouper.sections()
    }

    /// Rows in the filtered view.
    pub fn row_count(&self) -> usize {
        self.view.len()
    }

    /// Height of the whole view, for scrollbar sizing.
    pub fn total_height(&self) -> usize {
        self.layout.total_height()
    }

    /// See [`WindowedLayout::visible_range`].
    pub fn visible_range(&self, scroll: usize, viewport: usize) -> Option<VisibleRange> {
        self.layout.visible_range(scroll, viewport)
    }

    /// Rows intersecting `[scroll, scroll + viewport)` with their lines and geometry.
    pub fn visible_rows<'s>(
        &self,
        store: &'s LogStore,
        scroll: usize,
        viewport: usize,
    ) -> Vec<VisibleRow<'s>> {
        let Some(range) = self.visible_range(scroll, viewport) else {
            return Vec::new();
        };
        range
            .indices()
            .filter_map(|row| {
                Some(VisibleRow {
                    row,
                    line: self.view.line(row, store)?,
                    top: self.layout.offset_of(row)?,
                    height: self.layout.height_of(row)?,
                })
            })
            .collect()
    }

    /// Scroll offset that brings the line `ordinal` to the top, if it is in view.
    pub fn scroll_to_line(&self, ordinal: LineOrdinal) -> Option<usize> {
        self.view
            .position_of(ordinal)
            .and_then(|row| self.layout.offset_of(row))
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(
            ViewFilter::all(),
            HeightParams::default(),
            crate::sections::DEFAULT_CONTEXT_LENGTH,
        )
    }
}
