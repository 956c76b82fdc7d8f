//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible window of the editor buffer
//! and handles all scroll operations, vertical and horizontal.

use std::ops::Range;

/// Manages the visible portion of the buffer.
///
/// The viewport tracks:
/// - Text area dimensions (width, height)
/// - Current scroll offsets (lines and columns)
/// - Total buffer length in lines
///
/// # Example
///
/// ```
/// use htmlpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    col_offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Text area width in columns
    /// * `height` - Text area height in lines
    /// * `total_lines` - Total lines in the buffer
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            col_offset: 0,
            total_lines,
        }
    }

    /// Get the current scroll offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// First visible column.
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of lines in the buffer.
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Get the range of visible lines.
    ///
    /// Returns a range from the current offset to offset + height,
    /// clamped to the buffer bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    /// Scroll up by n lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by n lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    /// Go to the beginning of the buffer.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end of the buffer.
    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the minimum amount that brings `line` and `col` into view.
    pub fn ensure_visible(&mut self, line: usize, col: usize) {
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());

        let width = (self.width as usize).max(1);
        if col < self.col_offset {
            self.col_offset = col;
        } else if col >= self.col_offset + width {
            self.col_offset = col + 1 - width;
        }
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        // Clamp offset if the buffer is now shorter than the viewport
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of lines (e.g., after an edit).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Calculate the maximum valid offset.
    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.col_offset(), 0);
    }

    #[test]
    fn test_visible_range_at_bottom() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.go_to_bottom();
        assert_eq!(vp.visible_range(), 76..100);
    }

    #[test]
    fn test_visible_range_with_short_buffer() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert!(!vp.can_scroll_down());
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
        assert!(!vp.can_scroll_up());
    }

    #[test]
    fn test_ensure_visible_scrolls_down_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(15, 0);
        assert_eq!(vp.offset(), 6);
        assert_eq!(vp.visible_range(), 6..16);
    }

    #[test]
    fn test_ensure_visible_scrolls_up_to_line() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(50);
        vp.ensure_visible(20, 0);
        assert_eq!(vp.offset(), 20);
    }

    #[test]
    fn test_ensure_visible_keeps_offset_when_line_is_shown() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(5);
        vp.ensure_visible(8, 0);
        assert_eq!(vp.offset(), 5);
    }

    #[test]
    fn test_ensure_visible_scrolls_horizontally() {
        let mut vp = Viewport::new(20, 10, 5);
        vp.ensure_visible(0, 30);
        assert_eq!(vp.col_offset(), 11);
        vp.ensure_visible(0, 3);
        assert_eq!(vp.col_offset(), 3);
    }

    #[test]
    fn test_set_total_lines_clamps_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.go_to_bottom();
        vp.set_total_lines(12);
        assert_eq!(vp.offset(), 2);
    }

    #[test]
    fn test_resize_clamps_offset() {
        let mut vp = Viewport::new(80, 10, 30);
        vp.go_to_bottom();
        vp.resize(80, 25);
        assert_eq!(vp.offset(), 5);
    }
}
