//! Row height function.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Default floor for a row, in pixels.
pub const DEFAULT_MIN_ROW_HEIGHT: usize = 20;
/// Default pixels per height unit.
pub const DEFAULT_HEIGHT_UNIT: usize = 20;
/// Default display columns per height unit.
pub const DEFAULT_CHARS_PER_HEIGHT_UNIT: usize = 100;
/// Ceiling for a single row, in pixels.
///
/// Keeps cumulative offsets of any realistic view well inside `isize`.
pub const MAX_ROW_HEIGHT: usize = 1 << 20;

/// Parameters of the row height function.
///
/// Two equal `HeightParams` produce identical layouts for the same view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeightParams {
    /// Floor for every row, in pixels.
    pub min_row_height: usize,
    /// Pixels added per `chars_per_height_unit` display columns.
    pub height_unit: usize,
    /// Display columns per height unit.
    pub chars_per_height_unit: usize,
}

impl HeightParams {
    /// Parameters from the three settings.
    pub fn new(min_row_height: usize, height_unit: usize, chars_per_height_unit: usize) -> Self {
        Self {
            min_row_height,
            height_unit,
            chars_per_height_unit,
        }
    }

    /// `max(min_row_height, ceil(width / chars_per_height_unit) * height_unit)`,
    /// where width is the display width of `text`. Never zero, never above
    /// [`MAX_ROW_HEIGHT`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use logsift::view_state::height::HeightParams;
    /// let params = HeightParams::default();
    /// assert_eq!(params.row_height(""), 20);
    /// assert_eq!(params.row_height(&"x".repeat(100)), 20);
    /// assert_eq!(params.row_height(&"x".repeat(101)), 40);
    /// ```
    pub fn row_height(&self, text: &str) -> usize {
        let width = text.width();
        let units = width.div_ceil(self.chars_per_height_unit.max(1));
        units
            .saturating_mul(self.height_unit)
            .max(self.min_row_height)
            .clamp(1, MAX_ROW_HEIGHT)
    }
}

impl Default for HeightParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_ROW_HEIGHT,
            DEFAULT_HEIGHT_UNIT,
            DEFAULT_CHARS_PER_HEIGHT_UNIT,
        )
    }
}
