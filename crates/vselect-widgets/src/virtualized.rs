#![forbid(unsafe_code)]

//! Virtual window calculation for fixed-height rows.
//!
//! Only the rows near the viewport are materialized. Given the scroll
//! offset, the viewport height, the row height, and the row count,
//! [`compute_window`] returns the slice of rows to render and where to place
//! it inside a full-height spacer:
//!
//! ```text
//! visible_count = ceil(viewport_height / item_height) + 1
//! buffer        = floor(visible_count / 2)
//! start         = clamp(floor(scroll_offset / item_height) - buffer, 0, total)
//! end           = clamp(start + visible_count + 2 * buffer, 0, total)
//! top_padding   = start * item_height
//! total_height  = total * item_height
//! ```
//!
//! The extra row in `visible_count` avoids a blank edge while a row is
//! partially scrolled in; the buffer rows above and below hide the latency
//! between a scroll and the re-render it triggers.
//!
//! # Example
//!
//! ```
//! use vselect_widgets::virtualized::compute_window;
//!
//! let window = compute_window(360, 360, 36, 100);
//! assert_eq!(window.start, 5);
//! assert_eq!(window.end, 26);
//! assert_eq!(window.top_padding, 180);
//! assert_eq!(window.total_height, 3600);
//! ```

use std::ops::Range;

/// The rows to materialize and their layout offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualWindow {
    /// Scroll offset the window was computed for.
    pub scroll_offset: u64,
    /// First rendered row (inclusive).
    pub start: usize,
    /// Last rendered row (exclusive).
    pub end: usize,
    /// Offset of the first rendered row inside the spacer.
    pub top_padding: u64,
    /// Height of the full list.
    pub total_height: u64,
    /// Rows that fit in the viewport, plus one.
    pub visible_count: usize,
    /// Slack rows rendered on each side of the visible region.
    pub buffer: usize,
}

impl VirtualWindow {
    /// Rendered row indices.
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of rendered rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if no rows are rendered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether row `index` is materialized.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Space below the rendered rows inside the spacer.
    #[must_use]
    pub fn bottom_padding(&self, item_height: u32) -> u64 {
        let rendered = (self.len() as u64).saturating_mul(u64::from(item_height.max(1)));
        self.total_height
            .saturating_sub(self.top_padding.saturating_add(rendered))
    }
}

/// Compute the render window.
///
/// Zero heights are treated as one pixel so degenerate layouts still yield
/// a bounded window.
#[must_use]
pub fn compute_window(
    scroll_offset: u64,
    viewport_height: u32,
    item_height: u32,
    total_count: usize,
) -> VirtualWindow {
    let item_height = u64::from(item_height.max(1));
    let viewport_height = u64::from(viewport_height.max(1));

    let visible_count = to_index(viewport_height.div_ceil(item_height)).saturating_add(1);
    let buffer = visible_count / 2;

    let first_visible = to_index(scroll_offset / item_height);
    let start = first_visible.saturating_sub(buffer).min(total_count);
    let end = start
        .saturating_add(visible_count)
        .saturating_add(buffer.saturating_mul(2))
        .min(total_count);

    VirtualWindow {
        scroll_offset,
        start,
        end,
        top_padding: (start as u64).saturating_mul(item_height),
        total_height: (total_count as u64).saturating_mul(item_height),
        visible_count,
        buffer,
    }
}

/// Offset that scrolls row `index` to the top of the viewport.
#[inline]
#[must_use]
pub fn offset_of(index: usize, item_height: u32) -> u64 {
    (index as u64).saturating_mul(u64::from(item_height.max(1)))
}

/// Clamp a scroll offset to the scrollable range of the list.
#[must_use]
pub fn clamp_scroll_offset(
    offset: u64,
    viewport_height: u32,
    item_height: u32,
    total_count: usize,
) -> u64 {
    let total = (total_count as u64).saturating_mul(u64::from(item_height.max(1)));
    offset.min(total.saturating_sub(u64::from(viewport_height)))
}

#[inline]
fn to_index(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
