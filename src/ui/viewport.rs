//! Scroll state for a pane.
//!
//! Both panes scroll by whole rows: the editor by source lines, the preview
//! by wrapped rows.

use std::ops::Range;

/// The visible window onto `total_rows` rows of content.
///
/// # Example
///
/// ```
/// use markpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(20, 100);
/// vp.ensure_visible(30);
/// assert_eq!(vp.visible_range(), 11..31);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_rows: usize,
}

impl Viewport {
    pub const fn new(height: u16, total_rows: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_rows,
        }
    }

    /// Index of the first visible row.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_rows);
        start..end
    }

    /// Scroll position as a percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll the least amount that brings `row` into view.
    pub fn ensure_visible(&mut self, row: usize) {
        let height = self.height as usize;
        if height == 0 || row < self.offset {
            self.offset = row;
        } else if row >= self.offset + height {
            self.offset = row + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the content length, e.g. after an edit.
    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.height as usize)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_with_short_content() {
        let vp = Viewport::new(24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_page_up_and_down() {
        let mut vp = Viewport::new(24, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 24);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_minimally() {
        let mut vp = Viewport::new(10, 100);
        vp.ensure_visible(5);
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(15);
        assert_eq!(vp.offset(), 6);
        vp.ensure_visible(2);
        assert_eq!(vp.offset(), 2);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(80);
        vp.set_total_rows(50);
        assert_eq!(vp.offset(), 26);
        vp.resize(60);
        assert_eq!(vp.offset(), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn visible_range_within_bounds(
                total in 0..10000usize,
                height in 1..100u16,
                row in 0..10000usize,
            ) {
                let mut vp = Viewport::new(height, total);
                vp.ensure_visible(row);
                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total);
                if row < total {
                    prop_assert!(range.contains(&row));
                }
            }
        }
    }
}
