//! Memoized rasterized sprites (icons, checkboxes, chevrons).
//!
//! Rasterizing a vector glyph at a given size and tint is expensive enough to
//! do once, not once per frame. Entries evict in insertion order at a fixed
//! cap; the working set of distinct (id, size, color) triples in any real
//! grid is far below the cap, so churn only happens under pathological theme
//! switching.

use std::collections::{HashMap, VecDeque};

/// Default entry cap.
const DEFAULT_CAPACITY: usize = 256;

/// Identity of a rasterized sprite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    /// Glyph identifier (column icon name, "checkbox", "chevron", ...).
    pub id: String,
    /// Rasterized square size in physical pixels.
    pub size: u32,
    /// CSS color the glyph was tinted with.
    pub color: String,
}

impl SpriteKey {
    pub fn new(id: impl Into<String>, size: u32, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size,
            color: color.into(),
        }
    }
}

/// Insertion-order bounded sprite cache.
pub struct SpriteCache<S> {
    entries: HashMap<SpriteKey, S>,
    order: VecDeque<SpriteKey>,
    capacity: usize,
}

impl<S> Default for SpriteCache<S> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<S> SpriteCache<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &SpriteKey) -> Option<&S> {
        self.entries.get(key)
    }

    /// Insert a sprite, evicting the oldest entry when at capacity.
    pub fn insert(&mut self, key: SpriteKey, sprite: S) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, sprite);
            return;
        }
        while self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, sprite);
    }

    /// Cached sprite for `key`, rasterizing with `rasterize` on a miss.
    pub fn get_or_insert_with(&mut self, key: &SpriteKey, rasterize: impl FnOnce() -> S) -> &S {
        if !self.entries.contains_key(key) {
            while self.entries.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                } else {
                    break;
                }
            }
            self.order.push_back(key.clone());
        }
        self.entries.entry(key.clone()).or_insert_with(rasterize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything (theme change).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
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

    #[test]
    fn test_hit_and_miss() {
        let mut cache: SpriteCache<u32> = SpriteCache::new(4);
        let key = SpriteKey::new("checkbox", 14, "#333");
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), 1);
        assert_eq!(cache.get(&key), Some(&1));
        // Same id at a different size is a distinct sprite.
        assert!(cache.get(&SpriteKey::new("checkbox", 28, "#333")).is_none());
    }

    #[test]
    fn test_eviction_is_insertion_ordered() {
        let mut cache: SpriteCache<u32> = SpriteCache::new(2);
        cache.insert(SpriteKey::new("a", 16, "#000"), 1);
        cache.insert(SpriteKey::new("b", 16, "#000"), 2);
        cache.insert(SpriteKey::new("c", 16, "#000"), 3);
        assert!(cache.get(&SpriteKey::new("a", 16, "#000")).is_none());
        assert_eq!(cache.get(&SpriteKey::new("b", 16, "#000")), Some(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_or_insert_rasterizes_once() {
        let mut cache: SpriteCache<u32> = SpriteCache::new(4);
        let key = SpriteKey::new("chevron", 16, "#666");
        assert_eq!(*cache.get_or_insert_with(&key, || 9), 9);
        // A second lookup must not re-rasterize.
        assert_eq!(*cache.get_or_insert_with(&key, || 0), 9);
    }
}
