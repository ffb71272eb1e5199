//! Pure geometry oracle for the grid.
//!
//! Maps row/column indices to pixel offsets and back, answers freeze-region
//! and visible-range (virtualization) queries. Offsets are materialized
//! lazily into a measured-prefix cache so a grid with millions of rows never
//! pays an O(n) rebuild; a size override truncates the cache at the changed
//! index and everything after is re-measured on demand.
//!
//! All index queries clamp to `[0, count - 1]` instead of erroring: pointer
//! coordinates routinely fall slightly outside the last item during fast
//! scrolling.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{Rect, VisibleRegion};

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f32 = 150.0;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

/// Measured placement of a single row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ItemMetric {
    offset: f32,
    size: f32,
}

/// Measured-prefix cache: `metrics[i]` is valid for every `i < metrics.len()`,
/// with `metrics[i + 1].offset == metrics[i].offset + metrics[i].size`.
#[derive(Debug, Default)]
struct MetricsCache {
    metrics: Vec<ItemMetric>,
}

impl MetricsCache {
    /// Extend measurements through `index` (exclusive of `count` clamping,
    /// the caller guarantees `index < count`).
    fn ensure<F: Fn(usize) -> f32>(&mut self, index: usize, initial_offset: f32, size_of: &F) {
        if index < self.metrics.len() {
            return;
        }
        let mut offset = match self.metrics.last() {
            Some(last) => last.offset + last.size,
            None => initial_offset,
        };
        for i in self.metrics.len()..=index {
            let size = size_of(i);
            self.metrics.push(ItemMetric { offset, size });
            offset += size;
        }
    }

    /// Drop measurements at and after `index`.
    fn truncate_from(&mut self, index: usize) {
        self.metrics.truncate(index);
    }

    fn get(&self, index: usize) -> Option<ItemMetric> {
        self.metrics.get(index).copied()
    }

    fn measured_len(&self) -> usize {
        self.metrics.len()
    }

    fn measured_end(&self) -> f32 {
        self.metrics
            .last()
            .map_or(0.0, |last| last.offset + last.size)
    }

    /// Binary search the measured prefix for the item covering `offset`.
    /// Returns the last measured index when `offset` is past the end.
    fn search(&self, offset: f32) -> usize {
        if self.metrics.is_empty() {
            return 0;
        }
        let found = self
            .metrics
            .binary_search_by(|m| m.offset.partial_cmp(&offset).unwrap_or(std::cmp::Ordering::Equal));
        match found {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}

/// Construction parameters for [`CoordinateManager`].
#[derive(Debug, Clone)]
pub struct CoordinateOptions {
    pub row_count: usize,
    pub column_count: usize,
    pub container_width: f32,
    pub container_height: f32,
    /// Fallback row height for rows without an override.
    pub row_height: f32,
    /// Fallback column width for columns without an override.
    pub column_width: f32,
    pub row_height_map: HashMap<usize, f32>,
    pub column_width_map: HashMap<usize, f32>,
    /// Height of the column-header strip (row offsets start below it).
    pub row_initial_size: f32,
    /// Width of the row-header gutter (column offsets start right of it).
    pub column_initial_size: f32,
    pub freeze_column_count: usize,
}

impl Default for CoordinateOptions {
    fn default() -> Self {
        Self {
            row_count: 0,
            column_count: 0,
            container_width: 800.0,
            container_height: 600.0,
            row_height: DEFAULT_ROW_HEIGHT,
            column_width: DEFAULT_COLUMN_WIDTH,
            row_height_map: HashMap::new(),
            column_width_map: HashMap::new(),
            row_initial_size: 0.0,
            column_initial_size: 0.0,
            freeze_column_count: 0,
        }
    }
}

/// Row/column geometry for the whole grid.
///
/// Cheap to rebuild whenever counts or sizes change; holds no persisted
/// identity. Queries take `&self` (the measurement caches use interior
/// mutability) so the controllers, the classifier and the render pipeline
/// can share one instance.
pub struct CoordinateManager {
    row_count: usize,
    column_count: usize,
    container_width: f32,
    container_height: f32,
    row_height: f32,
    column_width: f32,
    row_height_map: HashMap<usize, f32>,
    column_width_map: HashMap<usize, f32>,
    row_initial_size: f32,
    column_initial_size: f32,
    freeze_column_count: usize,
    row_cache: RefCell<MetricsCache>,
    column_cache: RefCell<MetricsCache>,
}

impl CoordinateManager {
    /// Create a manager from construction options.
    pub fn new(options: CoordinateOptions) -> Self {
        let freeze = options.freeze_column_count.min(options.column_count);
        Self {
            row_count: options.row_count,
            column_count: options.column_count,
            container_width: options.container_width,
            container_height: options.container_height,
            row_height: options.row_height,
            column_width: options.column_width,
            row_height_map: options.row_height_map,
            column_width_map: options.column_width_map,
            row_initial_size: options.row_initial_size,
            column_initial_size: options.column_initial_size,
            freeze_column_count: freeze,
            row_cache: RefCell::new(MetricsCache::default()),
            column_cache: RefCell::new(MetricsCache::default()),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    pub fn freeze_column_count(&self) -> usize {
        self.freeze_column_count
    }

    /// Height of the column-header strip.
    pub fn row_initial_size(&self) -> f32 {
        self.row_initial_size
    }

    /// Width of the row-header gutter.
    pub fn column_initial_size(&self) -> f32 {
        self.column_initial_size
    }

    /// Replace the container dimensions (does not invalidate measurements).
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.container_width = width;
        self.container_height = height;
    }

    /// Replace the row count, dropping measurements past the new count.
    pub fn set_row_count(&mut self, count: usize) {
        self.row_count = count;
        self.row_cache.borrow_mut().truncate_from(count);
    }

    /// Replace the column count, dropping measurements past the new count.
    pub fn set_column_count(&mut self, count: usize) {
        self.column_count = count;
        self.freeze_column_count = self.freeze_column_count.min(count);
        self.column_cache.borrow_mut().truncate_from(count);
    }

    /// Override one row's height; measurements from that row on are stale.
    pub fn set_row_height(&mut self, index: usize, height: f32) {
        self.row_height_map.insert(index, height.max(0.0));
        self.row_cache.borrow_mut().truncate_from(index);
    }

    /// Override one column's width; measurements from that column on are stale.
    pub fn set_column_width(&mut self, index: usize, width: f32) {
        self.column_width_map.insert(index, width.max(0.0));
        self.column_cache.borrow_mut().truncate_from(index);
    }

    /// Height of row `index`, falling back to the default.
    pub fn row_height_at(&self, index: usize) -> f32 {
        let index = self.clamp_row(index);
        self.row_height_map
            .get(&index)
            .copied()
            .unwrap_or(self.row_height)
    }

    /// Width of column `index`, falling back to the default.
    pub fn column_width_at(&self, index: usize) -> f32 {
        let index = self.clamp_column(index);
        self.column_width_map
            .get(&index)
            .copied()
            .unwrap_or(self.column_width)
    }

    /// Content y of row `index`'s top edge (row 0 starts below the header
    /// strip). Out-of-range indices clamp to the boundary row.
    pub fn row_offset(&self, index: usize) -> f32 {
        if self.row_count == 0 {
            return self.row_initial_size;
        }
        let index = self.clamp_row(index);
        let mut cache = self.row_cache.borrow_mut();
        cache.ensure(index, self.row_initial_size, &|i| {
            self.row_height_map.get(&i).copied().unwrap_or(self.row_height)
        });
        cache.get(index).map_or(self.row_initial_size, |m| m.offset)
    }

    /// Content x of column `index`'s left edge (column 0 starts right of the
    /// gutter). Out-of-range indices clamp to the boundary column.
    pub fn column_offset(&self, index: usize) -> f32 {
        if self.column_count == 0 {
            return self.column_initial_size;
        }
        let index = self.clamp_column(index);
        let mut cache = self.column_cache.borrow_mut();
        cache.ensure(index, self.column_initial_size, &|i| {
            self.column_width_map
                .get(&i)
                .copied()
                .unwrap_or(self.column_width)
        });
        cache
            .get(index)
            .map_or(self.column_initial_size, |m| m.offset)
    }

    /// Total content height including the header strip.
    pub fn total_height(&self) -> f32 {
        if self.row_count == 0 {
            return self.row_initial_size;
        }
        let last = self.row_count - 1;
        self.row_offset(last) + self.row_height_at(last)
    }

    /// Total content width including the row-header gutter.
    pub fn total_width(&self) -> f32 {
        if self.column_count == 0 {
            return self.column_initial_size;
        }
        let last = self.column_count - 1;
        self.column_offset(last) + self.column_width_at(last)
    }

    /// Sum of the gutter plus all frozen column widths: content left of this
    /// line never scrolls horizontally.
    pub fn freeze_region_width(&self) -> f32 {
        if self.freeze_column_count == 0 {
            return self.column_initial_size;
        }
        let last_frozen = self.freeze_column_count - 1;
        self.column_offset(last_frozen) + self.column_width_at(last_frozen)
    }

    /// Index of the row covering content offset `y`. Offsets before the first
    /// row resolve to 0; offsets past the last row clamp to `row_count - 1`.
    pub fn row_index_at(&self, y: f32) -> usize {
        if self.row_count == 0 {
            return 0;
        }
        self.index_at(
            y,
            &self.row_cache,
            self.row_count,
            self.row_initial_size,
            &|i| self.row_height_map.get(&i).copied().unwrap_or(self.row_height),
        )
    }

    /// Index of the column covering content offset `x`, clamped like
    /// [`Self::row_index_at`].
    pub fn column_index_at(&self, x: f32) -> usize {
        if self.column_count == 0 {
            return 0;
        }
        self.index_at(
            x,
            &self.column_cache,
            self.column_count,
            self.column_initial_size,
            &|i| {
                self.column_width_map
                    .get(&i)
                    .copied()
                    .unwrap_or(self.column_width)
            },
        )
    }

    fn index_at<F: Fn(usize) -> f32>(
        &self,
        offset: f32,
        cache: &RefCell<MetricsCache>,
        count: usize,
        initial: f32,
        size_of: &F,
    ) -> usize {
        let mut cache = cache.borrow_mut();
        if offset <= initial {
            return 0;
        }
        // Extend the measured prefix with exponential stride until it covers
        // the requested offset (or the last item).
        while cache.measured_len() < count && cache.measured_end() < offset {
            let next = (cache.measured_len().max(1) * 2 - 1).min(count - 1);
            cache.ensure(next, initial, size_of);
        }
        cache.search(offset).min(count.saturating_sub(1))
    }

    /// First visible row for a vertical scroll offset.
    pub fn row_start_index(&self, scroll_top: f32) -> usize {
        self.row_index_at(scroll_top + self.row_initial_size)
    }

    /// Last visible row: walks forward from `start` accumulating heights until
    /// the viewport height is exhausted, then adds one item of overscan.
    pub fn row_stop_index(&self, start: usize, scroll_top: f32) -> usize {
        if self.row_count == 0 {
            return 0;
        }
        let bottom = scroll_top + self.container_height;
        let mut index = self.clamp_row(start);
        while index + 1 < self.row_count {
            if self.row_offset(index) + self.row_height_at(index) >= bottom {
                break;
            }
            index += 1;
        }
        (index + 1).min(self.row_count - 1)
    }

    /// First visible scrollable column for a horizontal scroll offset.
    pub fn column_start_index(&self, scroll_left: f32) -> usize {
        self.column_index_at(scroll_left + self.freeze_region_width())
    }

    /// Last visible column, with one item of overscan.
    pub fn column_stop_index(&self, start: usize, scroll_left: f32) -> usize {
        if self.column_count == 0 {
            return 0;
        }
        let right = scroll_left + self.container_width;
        let mut index = self.clamp_column(start);
        while index + 1 < self.column_count {
            if self.column_offset(index) + self.column_width_at(index) >= right {
                break;
            }
            index += 1;
        }
        (index + 1).min(self.column_count - 1)
    }

    /// The visible window for the given scroll offsets, with one overscan item
    /// on each side, clamped to `[0, count - 1]`.
    pub fn visible_region(&self, scroll_left: f32, scroll_top: f32) -> VisibleRegion {
        let start_row = self.row_start_index(scroll_top).saturating_sub(1);
        let stop_row = self.row_stop_index(start_row, scroll_top);
        let start_col = self.column_start_index(scroll_left).saturating_sub(1);
        let stop_col = self.column_stop_index(start_col, scroll_left);
        VisibleRegion {
            start_row_index: start_row,
            stop_row_index: stop_row,
            start_column_index: start_col,
            stop_column_index: stop_col,
        }
    }

    /// Cell bounds in content coordinates.
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            self.column_offset(col),
            self.row_offset(row),
            self.column_width_at(col),
            self.row_height_at(row),
        )
    }

    fn clamp_row(&self, index: usize) -> usize {
        index.min(self.row_count.saturating_sub(1))
    }

    fn clamp_column(&self, index: usize) -> usize {
        index.min(self.column_count.saturating_sub(1))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn manager(rows: usize, cols: usize) -> CoordinateManager {
        CoordinateManager::new(CoordinateOptions {
            row_count: rows,
            column_count: cols,
            ..CoordinateOptions::default()
        })
    }

    #[test]
    fn test_uniform_offsets() {
        let coord = manager(100, 10);
        assert_eq!(coord.row_offset(0), 0.0);
        assert_eq!(coord.row_offset(3), DEFAULT_ROW_HEIGHT * 3.0);
        assert_eq!(coord.column_offset(2), DEFAULT_COLUMN_WIDTH * 2.0);
        assert_eq!(coord.total_height(), DEFAULT_ROW_HEIGHT * 100.0);
        assert_eq!(coord.total_width(), DEFAULT_COLUMN_WIDTH * 10.0);
    }

    #[test]
    fn test_offsets_monotonic_with_overrides() {
        let mut options = CoordinateOptions {
            row_count: 50,
            column_count: 5,
            ..CoordinateOptions::default()
        };
        options.row_height_map.insert(3, 80.0);
        options.row_height_map.insert(10, 4.0);
        let coord = CoordinateManager::new(options);

        for i in 0..49 {
            assert_eq!(
                coord.row_offset(i + 1),
                coord.row_offset(i) + coord.row_height_at(i),
                "offset({}) + size({}) must equal offset({})",
                i,
                i,
                i + 1
            );
        }
    }

    #[test]
    fn test_index_at_round_trips() {
        let coord = manager(1000, 20);
        for i in [0usize, 1, 7, 99, 500, 999] {
            let y = coord.row_offset(i) + 1.0;
            assert_eq!(coord.row_index_at(y), i);
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let coord = manager(10, 4);
        assert_eq!(coord.row_offset(999), coord.row_offset(9));
        assert_eq!(coord.row_index_at(1e9), 9);
        assert_eq!(coord.column_index_at(-50.0), 0);
        assert_eq!(coord.column_index_at(1e9), 3);
    }

    #[test]
    fn test_size_override_invalidates_cache() {
        let mut coord = manager(100, 4);
        let before = coord.row_offset(20);
        coord.set_row_height(5, 100.0);
        let after = coord.row_offset(20);
        assert_eq!(after, before + (100.0 - DEFAULT_ROW_HEIGHT));
        // Rows before the override keep their offsets.
        assert_eq!(coord.row_offset(5), DEFAULT_ROW_HEIGHT * 5.0);
    }

    #[test]
    fn test_freeze_region_width() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 10,
            column_count: 6,
            column_initial_size: 40.0,
            freeze_column_count: 2,
            ..CoordinateOptions::default()
        });
        assert_eq!(
            coord.freeze_region_width(),
            40.0 + DEFAULT_COLUMN_WIDTH * 2.0
        );
    }

    #[test]
    fn test_visible_region_covers_viewport() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 10_000,
            column_count: 100,
            container_width: 800.0,
            container_height: 600.0,
            ..CoordinateOptions::default()
        });
        let region = coord.visible_region(0.0, 3210.0);
        let top = coord.row_offset(region.start_row_index);
        let bottom = coord.row_offset(region.stop_row_index)
            + coord.row_height_at(region.stop_row_index);
        assert!(top <= 3210.0);
        assert!(bottom >= 3210.0 + 600.0);
        assert!(region.stop_row_index < 10_000);
    }

    #[test]
    fn test_visible_region_overscan_is_bounded() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 1000,
            column_count: 10,
            container_height: 320.0,
            ..CoordinateOptions::default()
        });
        // 320px viewport over 32px rows covers exactly 10 rows; with one
        // overscan row on each side the window is at most 12 rows.
        let region = coord.visible_region(0.0, 3200.0);
        let span = region.stop_row_index - region.start_row_index + 1;
        assert!((10..=12).contains(&span), "span was {span}");
    }

    #[test]
    fn test_empty_grid() {
        let coord = manager(0, 0);
        assert_eq!(coord.total_height(), 0.0);
        assert_eq!(coord.row_index_at(100.0), 0);
        let region = coord.visible_region(0.0, 0.0);
        assert_eq!(region.stop_row_index, 0);
    }

    #[test]
    fn test_header_initial_sizes_shift_offsets() {
        let coord = CoordinateManager::new(CoordinateOptions {
            row_count: 10,
            column_count: 10,
            row_initial_size: 40.0,
            column_initial_size: 60.0,
            ..CoordinateOptions::default()
        });
        assert_eq!(coord.row_offset(0), 40.0);
        assert_eq!(coord.column_offset(0), 60.0);
        assert_eq!(coord.row_index_at(10.0), 0);
    }
}
