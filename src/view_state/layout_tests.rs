//! Tests for the windowed layout.

use super::*;
use crate::filter::{SeverityMask, ViewFilter};
use crate::model::{classify, LineOrdinal, LogStore};
use crate::view_state::height::MAX_ROW_HEIGHT;
use proptest::prelude::*;

/// Fixed 10px rows regardless of text length up to 80 columns.
fn flat() -> HeightParams {
    HeightParams::new(10, 10, 80)
}

fn layout_for(store: &LogStore, filter: ViewFilter) -> (FilteredView, WindowedLayout) {
    let view = FilteredView::from_store(store, filter);
    let layout = WindowedLayout::from_view(&view, store, flat());
    (view, layout)
}

mod visible_range {
    use super::*;

    #[test]
    fn empty_view_has_no_range() {
        let store = LogStore::from_lines(["a"]);
        let (_, layout) = layout_for(&store, ViewFilter::new(SeverityMask::Errors, ""));
        assert!(layout.is_empty());
        assert_eq!(layout.total_height(), 0);
        assert_eq!(layout.visible_range(0, 100), None);
    }

    #[test]
    fn top_of_view() {
        let store = LogStore::from_lines(["a", "b", "c", "d", "e"]);
        let (_, layout) = layout_for(&store, ViewFilter::all());
        let range = layout.visible_range(0, 25).unwrap();
        assert_eq!((range.first, range.last), (0, 2));
    }

    #[test]
    fn viewport_ending_on_row_boundary_excludes_next_row() {
        let store = LogStore::from_lines(["a", "b", "c", "d"]);
        let (_, layout) = layout_for(&store, ViewFilter::all());
        let range = layout.visible_range(0, 20).unwrap();
        assert_eq!((range.first, range.last), (0, 1));
    }

    #[test]
    fn viewport_taller_than_content_shows_everything() {
        let store = LogStore::from_lines(["a", "b"]);
        let (_, layout) = layout_for(&store, ViewFilter::all());
        let range = layout.visible_range(0, 1_000).unwrap();
        assert_eq!((range.first, range.last), (0, 1));
    }

    #[test]
    fn zero_viewport_yields_row_at_scroll() {
        let store = LogStore::from_lines(["a", "b", "c"]);
        let (_, layout) = layout_for(&store, ViewFilter::all());
        let range = layout.visible_range(12, 0).unwrap();
        assert_eq!((range.first, range.last), (1, 1));
    }

    #[test]
    fn scroll_past_end_clamps_to_last_row() {
        let store = LogStore::from_lines(["a", "b", "c"]);
        let (_, layout) = layout_for(&store, ViewFilter::all());
        let range = layout.visible_range(10_000, 50).unwrap();
        assert_eq!((range.first, range.last), (2, 2));
        assert_eq!(range.scroll_offset, 29);
    }

    #[test]
    fn oversized_height_settings_stay_finite() {
        let store = LogStore::from_lines(["abc", "def"]);
        let view = FilteredView::from_store(&store, ViewFilter::all());
        let params = HeightParams::new(20, usize::MAX / 2 + 1, 1);
        let layout = WindowedLayout::from_view(&view, &store, params);

        assert_eq!(layout.height_of(0), Some(MAX_ROW_HEIGHT));
        assert_eq!(layout.total_height(), 2 * MAX_ROW_HEIGHT);
        assert_eq!(layout.row_at(MAX_ROW_HEIGHT), Some(1));
        let range = layout.visible_range(MAX_ROW_HEIGHT - 1, 2).unwrap();
        assert_eq!((range.first, range.last), (0, 1));
    }

    #[test]
    fn variable_heights() {
        let long = "x".repeat(200);
        let store = LogStore::from_lines(["short".to_string(), long, "short".to_string()]);
        let view = FilteredView::from_store(&store, ViewFilter::all());
        let layout = WindowedLayout::from_view(&view, &store, HeightParams::new(20, 20, 100));

        assert_eq!(layout.height_of(1), Some(40));
        assert_eq!(layout.offset_of(2), Some(60));
        assert_eq!(layout.total_height(), 80);
        assert_eq!(layout.row_at(59), Some(1));
        assert_eq!(layout.row_at(60), Some(2));
        assert_eq!(layout.row_at(80), None);

        let range = layout.visible_range(30, 10).unwrap();
        assert_eq!((range.first, range.last), (1, 1));
    }
}

mod recomputation {
    use super::*;

    #[test]
    fn appended_rows_extend_without_rebuild() {
        let mut store = LogStore::new();
        store.push_line("Error a".into(), classify("Error a"));
        let mut view = FilteredView::new(ViewFilter::all().with_severity(SeverityMask::Errors));
        view.sync(&store);
        let mut layout = WindowedLayout::from_view(&view, &store, flat());
        assert_eq!(layout.len(), 1);

        store.push_line("ok".into(), classify("ok"));
        store.push_line("Error b".into(), classify("Error b"));
        view.sync(&store);
        assert_eq!(layout.sync(&view, &store), 1);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.total_height(), 20);
    }

    #[test]
    fn filter_change_rebuilds() {
        let store = LogStore::from_lines(["Error a", "b", "Warning c", "d"]);
        let (mut view, mut layout) = layout_for(&store, ViewFilter::all());
        assert_eq!(layout.len(), 4);

        view.set_filter(ViewFilter::all().with_severity(SeverityMask::Flagged), &store);
        assert_eq!(layout.sync(&view, &store), 2);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.total_height(), 20);
    }

    #[test]
    fn unchanged_view_measures_nothing() {
        let store = LogStore::from_lines(["a", "b"]);
        let (view, mut layout) = layout_for(&store, ViewFilter::all());
        assert_eq!(layout.sync(&view, &store), 0);
    }

    #[test]
    fn switching_views_rebuilds_even_with_equal_lengths() {
        let store = LogStore::from_lines(["a", "long line here"]);
        let narrow = HeightParams::new(10, 10, 5);
        let first = FilteredView::from_store(&store, ViewFilter::all().with_search("a"));
        let second = FilteredView::from_store(&store, ViewFilter::all().with_search("long"));
        let mut layout = WindowedLayout::from_view(&first, &store, narrow);
        assert_eq!(layout.total_height(), 10);

        layout.sync(&second, &store);
        assert_eq!(layout.total_height(), 30);
    }

    #[test]
    fn set_params_relayouts_every_row() {
        let store = LogStore::from_lines(["abcdef", "abc"]);
        let (view, mut layout) = layout_for(&store, ViewFilter::all());
        assert_eq!(layout.total_height(), 20);

        layout.set_params(HeightParams::new(5, 5, 2), &view, &store);
        assert_eq!(layout.height_of(0), Some(15));
        assert_eq!(layout.height_of(1), Some(10));
        assert_eq!(layout.total_height(), 25);
    }

    #[test]
    fn offsets_follow_view_rows_not_ordinals() {
        let store = LogStore::from_lines(["x", "Error one", "y", "Error two"]);
        let (view, layout) = layout_for(&store, ViewFilter::all().with_severity(SeverityMask::Errors));
        assert_eq!(view.get(1), Some(LineOrdinal::new(3)));
        assert_eq!(layout.offset_of(1), Some(10));
        assert_eq!(layout.offset_of(2), None);
    }
}

fn arb_store() -> impl Strategy<Value = LogStore> {
    prop::collection::vec("(Error|Warning|[a-z ]{0,300})[a-z ]{0,20}", 1..80).prop_map(LogStore::from_lines)
}

fn arb_mask() -> impl Strategy<Value = SeverityMask> {
    prop_oneof![
        Just(SeverityMask::All),
        Just(SeverityMask::Errors),
        Just(SeverityMask::Warnings),
        Just(SeverityMask::Flagged),
        Just(SeverityMask::Sections),
    ]
}

fn arb_filtered_layout() -> impl Strategy<Value = (LogStore, FilteredView, WindowedLayout)> {
    (arb_store(), arb_mask()).prop_map(|(store, mask)| {
        let view = FilteredView::from_store(&store, ViewFilter::all().with_severity(mask));
        let layout = WindowedLayout::from_view(&view, &store, HeightParams::new(20, 20, 100));
        (store, view, layout)
    })
}

proptest! {
    /// total_height() equals the sum of the heights of the filtered rows.
    #[test]
    fn prop_total_is_sum_of_heights((store, view, layout) in arb_filtered_layout()) {
        let params = layout.params();
        let expected: usize = view
            .rows()
            .iter()
            .map(|o| params.row_height(store.get(*o).unwrap().text()))
            .sum();
        prop_assert_eq!(layout.len(), view.len());
        prop_assert_eq!(layout.total_height(), expected);
    }

    /// Paging through the view in viewport steps touches every row, never
    /// skips one, and never returns an index outside the view.
    #[test]
    fn prop_paging_covers_every_row((_store, _view, layout) in arb_filtered_layout(), viewport in 1usize..200) {
        let mut next_uncovered = 0;
        let mut scroll = 0;
        while scroll < layout.total_height() {
            let range = layout.visible_range(scroll, viewport).unwrap();
            prop_assert!(range.last < layout.len());
            // contiguous with the previous page, overlapping only a straddling row
            prop_assert!(range.first <= next_uncovered);
            prop_assert!(range.first + 1 >= next_uncovered);
            next_uncovered = next_uncovered.max(range.last + 1);
            scroll += viewport;
        }
        prop_assert_eq!(next_uncovered, layout.len());
    }

    /// The range is exactly the rows intersecting the viewport: every returned
    /// row intersects it, the row before ends at or above its top and the row
    /// after starts at or below its bottom.
    #[test]
    fn prop_range_is_minimal(
        (_store, _view, layout) in arb_filtered_layout(),
        scroll in 0usize..5_000,
        viewport in 1usize..300,
    ) {
        let Some(range) = layout.visible_range(scroll, viewport) else {
            prop_assert!(layout.is_empty());
            return Ok(());
        };
        let top = range.scroll_offset;
        let bottom = top + viewport;
        for row in range.indices() {
            let row_top = layout.offset_of(row).unwrap();
            let row_bottom = row_top + layout.height_of(row).unwrap();
            prop_assert!(row_top < bottom && row_bottom > top);
        }
        if range.first > 0 {
            let before = range.first - 1;
            let before_bottom = layout.offset_of(before).unwrap() + layout.height_of(before).unwrap();
            prop_assert!(before_bottom <= top);
        }
        if let Some(after_top) = layout.offset_of(range.last + 1) {
            prop_assert!(after_top >= bottom);
        }
    }
}
