//! Row layout and windowing for the thumbnail grid
//!
//! Cells have a fixed aspect ratio, so every row is assumed to be the same
//! height and the height is estimated from the density instead of measured.
//! Content with varying row heights would need measured heights (a prefix
//! sum over rows) rather than another entry in the estimate table.

use std::ops::Range;

use crate::columns::{resolve_columns, Density};

/// Lists shorter than this render as a plain static grid
pub const VIRTUALIZE_THRESHOLD: usize = 100;

/// Extra rows materialized above and below the viewport
pub const OVERSCAN_ROWS: usize = 3;

/// Estimated row height in px: square thumbnail, caption and gap
pub fn row_height_estimate(density: Density) -> f64 {
    match density {
        Density::Compact => 180.0,
        Density::Standard => 260.0,
        Density::Comfortable => 360.0,
    }
}

pub fn row_count(item_count: usize, column_count: u32) -> usize {
    let columns = column_count.max(1) as usize;
    item_count.div_ceil(columns)
}

/// Item indices belonging to `row`
pub fn row_items(row: usize, column_count: u32, item_count: usize) -> Range<usize> {
    let columns = column_count.max(1) as usize;
    let start = (row * columns).min(item_count);
    let end = ((row + 1) * columns).min(item_count);
    start..end
}

/// Rows intersecting `[scroll_top - overscan, scroll_top + viewport + overscan]`.
pub fn visible_rows(
    row_count: usize,
    row_height: f64,
    scroll_top: f64,
    viewport_height: f64,
    overscan_rows: usize,
) -> Range<usize> {
    if row_count == 0 || !(row_height > 0.0) {
        return 0..0;
    }
    let scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };
    let viewport_height = if viewport_height.is_finite() { viewport_height.max(0.0) } else { 0.0 };
    let overscan = overscan_rows as f64 * row_height;

    let top = (scroll_top - overscan).max(0.0);
    let bottom = scroll_top + viewport_height + overscan;

    let first = ((top / row_height).floor() as usize).min(row_count);
    let end = ((bottom / row_height).ceil() as usize).clamp(first, row_count);
    first..end
}

/// Derived layout for the current viewport and density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub column_count: u32,
    pub row_height: f64,
    pub container_height: f64,
}

impl ViewportLayout {
    pub fn compute(viewport_width: f64, container_height: f64, density: Density) -> Self {
        Self {
            column_count: resolve_columns(viewport_width, density),
            row_height: row_height_estimate(density),
            container_height,
        }
    }

    pub fn total_height(&self, item_count: usize) -> f64 {
        row_count(item_count, self.column_count) as f64 * self.row_height
    }
}

/// A materialized row of rendered cells
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow<C> {
    pub index: usize,
    /// Offset from the top of the scroll container in px
    pub top: f64,
    pub items: Range<usize>,
    pub cells: Vec<C>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridOutput<C> {
    /// Nothing to show; the caller renders its empty-state message
    Empty,
    /// Every row, laid out by normal flow
    Static { column_count: u32, rows: Vec<GridRow<C>> },
    /// Only the rows in the virtual window, absolutely positioned
    Windowed {
        column_count: u32,
        total_height: f64,
        window: Range<usize>,
        rows: Vec<GridRow<C>>,
    },
}

impl<C> GridOutput<C> {
    pub fn rows(&self) -> &[GridRow<C>] {
        match self {
            GridOutput::Empty => &[],
            GridOutput::Static { rows, .. } | GridOutput::Windowed { rows, .. } => rows,
        }
    }

    pub fn is_windowed(&self) -> bool {
        matches!(self, GridOutput::Windowed { .. })
    }
}

/// Scroll and size state of the grid container.
///
/// Resizing or changing density recomputes the column count and row height
/// but keeps the scroll offset in pixels, so the items under the viewport
/// may shift after a re-layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GridViewport {
    density: Density,
    width: f64,
    scroll_top: f64,
    layout: ViewportLayout,
}

impl GridViewport {
    pub fn new(width: f64, height: f64, density: Density) -> Self {
        Self {
            density,
            width,
            scroll_top: 0.0,
            layout: ViewportLayout::compute(width, height, density),
        }
    }

    pub fn layout(&self) -> ViewportLayout {
        self.layout
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.layout = ViewportLayout::compute(width, height, self.density);
    }

    pub fn set_density(&mut self, density: Density) {
        self.relayout(self.width, density);
    }

    /// Recompute columns and row height for a new width or density
    pub fn relayout(&mut self, width: f64, density: Density) {
        self.width = width;
        self.density = density;
        self.layout = ViewportLayout::compute(width, self.layout.container_height, density);
    }

    /// Pull the scroll offset back inside the content after a re-layout
    /// shortened it.
    pub fn clamp_scroll(&mut self, item_count: usize) {
        let max_scroll = (self.layout.total_height(item_count) - self.layout.container_height).max(0.0);
        self.scroll_top = self.scroll_top.min(max_scroll);
    }

    /// Rows to materialize for `item_count` items
    pub fn window(&self, item_count: usize) -> Range<usize> {
        visible_rows(
            row_count(item_count, self.layout.column_count),
            self.layout.row_height,
            self.scroll_top,
            self.layout.container_height,
            OVERSCAN_ROWS,
        )
    }

    pub fn render<T, C>(&self, items: &[T], mut render_item: impl FnMut(&T) -> C) -> GridOutput<C> {
        let columns = self.layout.column_count;
        let row_height = self.layout.row_height;
        let mut build_row = |index: usize| {
            let range = row_items(index, columns, items.len());
            GridRow {
                index,
                top: index as f64 * row_height,
                cells: items[range.clone()].iter().map(&mut render_item).collect(),
                items: range,
            }
        };

        if items.is_empty() {
            GridOutput::Empty
        } else if items.len() < VIRTUALIZE_THRESHOLD {
            GridOutput::Static {
                column_count: columns,
                rows: (0..row_count(items.len(), columns)).map(&mut build_row).collect(),
            }
        } else {
            let window = self.window(items.len());
            GridOutput::Windowed {
                column_count: columns,
                total_height: self.layout.total_height(items.len()),
                rows: window.clone().map(&mut build_row).collect(),
                window,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<usize> {
        (0..count).collect()
    }

    fn rendered(output: &GridOutput<usize>) -> Vec<usize> {
        output.rows().iter().flat_map(|row| row.cells.iter().copied()).collect()
    }

    #[test]
    fn test_row_math() {
        assert_eq!(row_count(0, 5), 0);
        assert_eq!(row_count(10, 5), 2);
        assert_eq!(row_count(11, 5), 3);
        assert_eq!(row_items(2, 5, 11), 10..11);
        assert_eq!(row_items(3, 5, 11), 11..11);
    }

    #[test]
    fn test_empty_list_renders_empty_state() {
        let viewport = GridViewport::new(1280.0, 800.0, Density::Standard);
        let output = viewport.render(&Vec::<usize>::new(), |i| *i);
        assert_eq!(output, GridOutput::Empty);
        assert!(output.rows().is_empty());
    }

    #[test]
    fn test_below_threshold_renders_everything() {
        let mut viewport = GridViewport::new(1280.0, 400.0, Density::Standard);
        viewport.set_scroll_top(5000.0);
        let output = viewport.render(&ids(99), |i| *i);
        assert!(!output.is_windowed());
        assert_eq!(rendered(&output), ids(99));
        assert_eq!(output.rows().len(), 20);
    }

    #[test]
    fn test_above_threshold_renders_window_only() {
        // 5 columns at 1280px, 260px rows, 21 rows in total.
        let mut viewport = GridViewport::new(1280.0, 520.0, Density::Standard);
        viewport.set_scroll_top(1300.0);
        let output = viewport.render(&ids(101), |i| *i);

        let GridOutput::Windowed { total_height, window, rows, column_count } = &output else {
            panic!("expected a windowed grid");
        };
        assert_eq!(*column_count, 5);
        assert_eq!(*total_height, 21.0 * 260.0);
        // scroll_top sits on row 5, the viewport spans two rows, plus three rows each side.
        assert_eq!(*window, 2..10);
        assert_eq!(rows.first().map(|r| r.top), Some(2.0 * 260.0));
        assert_eq!(rendered(&output), (10..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_at_top_and_bottom() {
        let mut viewport = GridViewport::new(1280.0, 520.0, Density::Standard);
        assert_eq!(viewport.window(500), 0..5);

        viewport.set_scroll_top(100_000.0);
        assert_eq!(viewport.window(500), 100..100);

        viewport.set_scroll_top(99.0 * 260.0 - 520.0);
        assert_eq!(viewport.window(500), 94..100);
    }

    #[test]
    fn test_partial_rows_are_included() {
        assert_eq!(visible_rows(50, 100.0, 150.0, 100.0, 0), 1..3);
        assert_eq!(visible_rows(50, 100.0, 150.0, 100.0, 1), 0..4);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(visible_rows(0, 100.0, 0.0, 500.0, 3), 0..0);
        assert_eq!(visible_rows(10, 0.0, 0.0, 500.0, 3), 0..0);
        assert_eq!(visible_rows(10, 100.0, f64::NAN, 250.0, 0), 0..3);
    }

    #[test]
    fn test_density_change_relayout_keeps_every_item_once() {
        let items = ids(240);
        let mut viewport = GridViewport::new(1280.0, 100_000.0, Density::Standard);
        let before = viewport.render(&items, |i| *i);
        assert_eq!(viewport.layout().column_count, 5);
        assert_eq!(before.rows()[2].cells[0], 10);

        viewport.set_density(Density::Compact);
        assert_eq!(viewport.layout().column_count, 8);
        let after = viewport.render(&items, |i| *i);

        // Item 10 moved from row 2 to row 1.
        let row_of_10 = after.rows().iter().find(|r| r.items.contains(&10)).map(|r| r.index);
        assert_eq!(row_of_10, Some(1));
        assert_eq!(rendered(&after), items);
    }

    #[test]
    fn test_relayout_preserves_pixel_offset() {
        let items = ids(1000);
        let mut viewport = GridViewport::new(1280.0, 520.0, Density::Standard);
        viewport.set_scroll_top(2600.0);
        let first_before = viewport.render(&items, |i| *i).rows()[0].items.start;

        viewport.resize(640.0, 520.0);
        assert_eq!(viewport.scroll_top(), 2600.0);
        assert_eq!(viewport.layout().column_count, 3);
        let first_after = viewport.render(&items, |i| *i).rows()[0].items.start;

        // Same pixels, different items: the offset is not kept in item terms.
        assert_eq!(first_before, 7 * 5);
        assert_eq!(first_after, 7 * 3);
    }

    #[test]
    fn test_relayout_clamps_to_shorter_content() {
        // 100 items: 34 rows at 3 columns, 13 rows at 8 columns.
        let mut viewport = GridViewport::new(640.0, 520.0, Density::Standard);
        viewport.set_scroll_top(30.0 * 260.0);
        viewport.relayout(1280.0, Density::Compact);
        assert_eq!(viewport.layout().column_count, 8);
        assert_eq!(viewport.scroll_top(), 30.0 * 260.0);

        viewport.clamp_scroll(100);
        assert_eq!(viewport.scroll_top(), 13.0 * 180.0 - 520.0);

        viewport.clamp_scroll(0);
        assert_eq!(viewport.scroll_top(), 0.0);
    }

    #[test]
    fn test_negative_scroll_is_clamped() {
        let mut viewport = GridViewport::new(800.0, 600.0, Density::Comfortable);
        viewport.set_scroll_top(-40.0);
        assert_eq!(viewport.scroll_top(), 0.0);
    }
}
