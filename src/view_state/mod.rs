//! View-state layer - row heights, cumulative offsets and visible ranges
//!
//! # Module Structure
//!
//! - `height`: HeightParams - the row height function
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `visible_range`: VisibleRange - result of a visible range query
//! - `layout`: WindowedLayout - heights for the current filtered view

pub mod height;
pub mod height_index;
pub mod layout;
pub mod visible_range;

pub use height::HeightParams;
pub use height_index::HeightIndex;
pub use layout::WindowedLayout;
pub use visible_range::VisibleRange;
