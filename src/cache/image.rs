//! Windowed cache of decoded cell images.
//!
//! Image cells reference URLs; decoding happens asynchronously through an
//! [`ImageLoader`]. The cache tracks which cells reference which URL, so one
//! URL shared by many cells decodes once. When the visible window moves, URLs
//! no longer referenced by any in-window cell are evicted: in-flight loads
//! are cancelled and decoded resources are recycled through the pool. Frozen
//! columns are always in-window.
//!
//! Stale completions are the main hazard: a load can finish after its URL was
//! evicted or re-requested. Each load carries a generation token and a
//! completion is dropped unless its token is still current.

use std::collections::{HashMap, HashSet};

use crate::cache::pool::ResourcePool;
use crate::types::{CellCoord, VisibleRegion};

/// Base for packing `[column, row]` into a single cache key.
/// Supports up to 2^21 columns and 2^43 rows.
pub const CELL_PACK_BASE: u64 = 1 << 21;

/// Milliseconds between dirty-cell flushes.
const FLUSH_INTERVAL_MS: f64 = 20.0;

/// Default capacity of the recycled-resource pool.
const DEFAULT_POOL_CAPACITY: usize = 64;

/// Pack a cell coordinate into a cache key.
pub fn pack_cell(cell: CellCoord) -> u64 {
    let [col, row] = cell;
    row as u64 * CELL_PACK_BASE + col as u64
}

/// Recover the cell coordinate from a packed key.
pub fn unpack_cell(key: u64) -> CellCoord {
    let col = usize::try_from(key % CELL_PACK_BASE).unwrap_or(usize::MAX);
    let row = usize::try_from(key / CELL_PACK_BASE).unwrap_or(usize::MAX);
    [col, row]
}

/// Starts and cancels asynchronous image loads.
///
/// Completions re-enter the cache through [`ImageCache::complete`] /
/// [`ImageCache::fail`], carrying the generation token the load began with.
pub trait ImageLoader<R> {
    fn begin(&mut self, url: &str, generation: u64);
    fn cancel(&mut self, url: &str);
}

#[derive(Debug)]
enum Slot<R> {
    Loading,
    Ready(R),
    Failed,
}

#[derive(Debug)]
struct Entry<R> {
    slot: Slot<R>,
    generation: u64,
    /// Packed keys of cells referencing this URL.
    refs: HashSet<u64>,
}

/// URL-keyed image cache scoped to the visible window.
pub struct ImageCache<R> {
    entries: HashMap<String, Entry<R>>,
    pool: ResourcePool<R>,
    dirty: HashSet<u64>,
    next_generation: u64,
    last_flush_ms: f64,
}

impl<R> Default for ImageCache<R> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl<R> ImageCache<R> {
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            pool: ResourcePool::new(pool_capacity),
            dirty: HashSet::new(),
            next_generation: 0,
            last_flush_ms: f64::NEG_INFINITY,
        }
    }

    /// Decoded resource for `url`, if ready.
    pub fn get(&self, url: &str) -> Option<&R> {
        match self.entries.get(url) {
            Some(Entry {
                slot: Slot::Ready(resource),
                ..
            }) => Some(resource),
            _ => None,
        }
    }

    /// Whether the URL failed to decode.
    pub fn is_failed(&self, url: &str) -> bool {
        matches!(
            self.entries.get(url),
            Some(Entry {
                slot: Slot::Failed,
                ..
            })
        )
    }

    /// Register that `cell` references `url`, starting a load if this URL is
    /// not yet tracked. Returns true when the resource is already decoded.
    pub fn request(&mut self, url: &str, cell: CellCoord, loader: &mut impl ImageLoader<R>) -> bool {
        let key = pack_cell(cell);
        if let Some(entry) = self.entries.get_mut(url) {
            entry.refs.insert(key);
            return matches!(entry.slot, Slot::Ready(_));
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        let mut refs = HashSet::new();
        refs.insert(key);
        self.entries.insert(
            url.to_owned(),
            Entry {
                slot: Slot::Loading,
                generation,
                refs,
            },
        );
        loader.begin(url, generation);
        false
    }

    /// Deliver a decoded resource. Dropped into the pool when the token is
    /// stale or the URL was evicted; otherwise the referencing cells are
    /// marked dirty for the next flush.
    pub fn complete(&mut self, url: &str, generation: u64, resource: R) {
        match self.entries.get_mut(url) {
            Some(entry) if entry.generation == generation => {
                if matches!(entry.slot, Slot::Loading) {
                    entry.slot = Slot::Ready(resource);
                    self.dirty.extend(entry.refs.iter().copied());
                } else {
                    self.pool.release(resource);
                }
            }
            _ => self.pool.release(resource),
        }
    }

    /// Record a failed load. Stale tokens are ignored.
    pub fn fail(&mut self, url: &str, generation: u64) {
        if let Some(entry) = self.entries.get_mut(url) {
            if entry.generation == generation && matches!(entry.slot, Slot::Loading) {
                entry.slot = Slot::Failed;
                self.dirty.extend(entry.refs.iter().copied());
            }
        }
    }

    /// Drain cells whose images completed since the last flush, at most once
    /// per flush interval. `None` means nothing to repaint yet.
    pub fn take_dirty_cells(&mut self, now_ms: f64) -> Option<Vec<CellCoord>> {
        if self.dirty.is_empty() || now_ms - self.last_flush_ms < FLUSH_INTERVAL_MS {
            return None;
        }
        self.last_flush_ms = now_ms;
        let cells = self.dirty.drain().map(unpack_cell).collect();
        Some(cells)
    }

    /// Re-scope the cache to a new visible window. References from cells that
    /// left the window are dropped; URLs with no remaining references are
    /// evicted. Cells in frozen columns count as in-window regardless of the
    /// horizontal range.
    pub fn set_window(
        &mut self,
        window: &VisibleRegion,
        freeze_column_count: usize,
        loader: &mut impl ImageLoader<R>,
    ) {
        let mut evicted: Vec<String> = Vec::new();
        for (url, entry) in &mut self.entries {
            entry.refs.retain(|&key| {
                let [col, row] = unpack_cell(key);
                window.contains_row(row) && (col < freeze_column_count || window.contains_column(col))
            });
            if entry.refs.is_empty() {
                evicted.push(url.clone());
            }
        }
        for url in evicted {
            if let Some(entry) = self.entries.remove(&url) {
                match entry.slot {
                    Slot::Loading => loader.cancel(&url),
                    Slot::Ready(resource) => self.pool.release(resource),
                    Slot::Failed => {}
                }
            }
        }
        let entries = &self.entries;
        self.dirty
            .retain(|&key| entries.values().any(|e| e.refs.contains(&key)));
    }

    /// Take a recycled resource for the loader to reuse.
    pub fn recycled(&mut self) -> Option<R> {
        self.pool.acquire()
    }

    /// Number of tracked URLs (for assertions).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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

    /// Records loader calls; the "resource" is just a marker integer.
    #[derive(Default)]
    struct TestLoader {
        begun: Vec<(String, u64)>,
        cancelled: Vec<String>,
    }

    impl ImageLoader<u32> for TestLoader {
        fn begin(&mut self, url: &str, generation: u64) {
            self.begun.push((url.to_owned(), generation));
        }

        fn cancel(&mut self, url: &str) {
            self.cancelled.push(url.to_owned());
        }
    }

    fn window(rows: [usize; 2], cols: [usize; 2]) -> VisibleRegion {
        VisibleRegion {
            start_row_index: rows[0],
            stop_row_index: rows[1],
            start_column_index: cols[0],
            stop_column_index: cols[1],
        }
    }

    #[test]
    fn test_pack_round_trip() {
        assert_eq!(unpack_cell(pack_cell([5, 1_000_000])), [5, 1_000_000]);
        assert_eq!(unpack_cell(pack_cell([0, 0])), [0, 0]);
    }

    #[test]
    fn test_shared_url_loads_once() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        assert!(!cache.request("a.png", [0, 0], &mut loader));
        assert!(!cache.request("a.png", [1, 0], &mut loader));
        assert_eq!(loader.begun.len(), 1);

        let (_, generation) = loader.begun[0].clone();
        cache.complete("a.png", generation, 42);
        assert_eq!(cache.get("a.png"), Some(&42));
        // Both referencing cells are reported dirty.
        let mut dirty = cache.take_dirty_cells(100.0).unwrap();
        dirty.sort_unstable();
        assert_eq!(dirty, vec![[0, 0], [1, 0]]);
    }

    #[test]
    fn test_dirty_flush_is_throttled() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        cache.request("a.png", [0, 0], &mut loader);
        cache.complete("a.png", 1, 1);
        assert!(cache.take_dirty_cells(100.0).is_some());

        cache.request("b.png", [1, 0], &mut loader);
        cache.complete("b.png", 2, 2);
        // Within the flush interval: held back.
        assert!(cache.take_dirty_cells(110.0).is_none());
        assert!(cache.take_dirty_cells(121.0).is_some());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        cache.request("a.png", [5, 5], &mut loader);
        // Window move evicts the URL before the load finishes.
        cache.set_window(&window([0, 2], [0, 2]), 0, &mut loader);
        assert_eq!(loader.cancelled, vec!["a.png".to_owned()]);

        cache.complete("a.png", 1, 42);
        assert_eq!(cache.get("a.png"), None);
        // The stale resource was recycled, not leaked.
        assert_eq!(cache.recycled(), Some(42));
        assert!(cache.take_dirty_cells(1000.0).is_none());
    }

    #[test]
    fn test_window_move_evicts_only_unreferenced() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        // Shared by a cell that stays visible and one that leaves.
        cache.request("a.png", [1, 1], &mut loader);
        cache.request("a.png", [1, 50], &mut loader);
        cache.request("b.png", [2, 50], &mut loader);
        cache.complete("a.png", 1, 10);
        cache.complete("b.png", 2, 20);
        cache.take_dirty_cells(0.0);

        cache.set_window(&window([0, 10], [0, 10]), 0, &mut loader);
        // a.png survives through its still-visible reference.
        assert_eq!(cache.get("a.png"), Some(&10));
        assert_eq!(cache.get("b.png"), None);
        assert_eq!(cache.recycled(), Some(20));
    }

    #[test]
    fn test_frozen_columns_stay_in_window() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        cache.request("a.png", [0, 5], &mut loader);
        // Horizontal window far to the right, but column 0 is frozen.
        cache.set_window(&window([0, 10], [40, 50]), 1, &mut loader);
        assert_eq!(cache.len(), 1);
        // Without the freeze it would have been evicted.
        cache.set_window(&window([0, 10], [40, 50]), 0, &mut loader);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_load_marks_cells_dirty() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        cache.request("a.png", [3, 3], &mut loader);
        cache.fail("a.png", 1);
        assert!(cache.is_failed("a.png"));
        assert_eq!(cache.take_dirty_cells(50.0), Some(vec![[3, 3]]));
    }

    #[test]
    fn test_rerequest_after_eviction_gets_new_generation() {
        let mut cache: ImageCache<u32> = ImageCache::default();
        let mut loader = TestLoader::default();
        cache.request("a.png", [5, 5], &mut loader);
        cache.set_window(&window([0, 2], [0, 2]), 0, &mut loader);
        cache.request("a.png", [1, 1], &mut loader);

        assert_eq!(loader.begun.len(), 2);
        let first = loader.begun[0].1;
        let second = loader.begun[1].1;
        assert_ne!(first, second);
        // The original load finishing late must not satisfy the new request.
        cache.complete("a.png", first, 99);
        assert_eq!(cache.get("a.png"), None);
        cache.complete("a.png", second, 7);
        assert_eq!(cache.get("a.png"), Some(&7));
    }
}
