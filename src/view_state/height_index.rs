//! HeightIndex - O(log n) prefix sums and offset lookup via Fenwick tree
//!
//! Maps row indices to cumulative pixel offsets and back without rescanning
//! the rows before them.
//!
//! # Complexity
//!
//! - `push`: O(log n) amortized
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `height`, `total`, `len`: O(1)
//! - `clear`: O(capacity)
//!
//! Heights are clamped to [`MAX_ROW_HEIGHT`] so the signed Fenwick sums
//! cannot wrap.

use super::height::MAX_ROW_HEIGHT;

/// Fenwick tree over row heights.
///
/// Keeps a plain copy of every height alongside the tree so single heights
/// and the total are O(1), and so the tree can be rebuilt when it grows.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage; its length is the capacity.
    tree: Vec<isize>,
    /// Height of each row, `heights.len()` is the row count.
    heights: Vec<usize>,
    total: usize,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    /// Build an index from a sequence of heights.
    pub fn from_heights<I: IntoIterator<Item = usize>>(heights: I) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self::new(heights.len());
        for height in heights {
            index.push(height);
        }
        index
    }

    /// Appends a row with the given height, clamped to [`MAX_ROW_HEIGHT`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(1);
    /// index.push(5);
    /// index.push(3);
    /// index.push(7);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 15);
    /// assert_eq!(index.offset_of(2), 8);
    /// ```
    pub fn push(&mut self, height: usize) {
        let height = height.min(MAX_ROW_HEIGHT);
        let idx = self.heights.len();
        if idx >= self.tree.len() {
            self.grow();
        }
        self.heights.push(height);
        self.total = self.total.saturating_add(height);
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }

    /// Replaces the height of row `index`, clamped to [`MAX_ROW_HEIGHT`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let height = height.min(MAX_ROW_HEIGHT);
        let current = self.heights[index];
        if current == height {
            return;
        }
        let delta = height as isize - current as isize;
        fenwick::array::update(&mut self.tree, index, delta);
        self.heights[index] = height;
        self.total = (self.total - current).saturating_add(height);
    }

    /// Height of row `index`, if present.
    pub fn height(&self, index: usize) -> Option<usize> {
        self.heights.get(index).copied()
    }

    /// Cumulative height up to and including row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Offset of the top edge of row `index`: the sum of all heights before it.
    ///
    /// `offset_of(len())` is the total height.
    pub fn offset_of(&self, index: usize) -> usize {
        match index {
            0 => 0,
            i if i >= self.len() => self.total,
            i => self.prefix_sum(i - 1),
        }
    }

    /// First index where `prefix_sum(index) > value`: the row covering offset `value`.
    ///
    /// Returns `None` when `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]); // [0,10) [10,30) [30,45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(29), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if value >= self.total {
            return None;
        }

        // Row i covers [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Sum of all heights.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Removes every row, keeping the allocation.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
        self.total = 0;
    }

    /// Double the tree and re-insert every height.
    ///
    /// Fenwick nodes past the old capacity must cover ranges that include
    /// existing rows, so a zero-filled resize alone would lose their sums.
    fn grow(&mut self) {
        let capacity = (self.tree.len() * 2).max(16);
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, height as isize);
        }
    }
}
