//! Bounded free list for recycled image resources.

/// Holds released resources for reuse, up to a fixed cap. Resources released
/// while the pool is full are dropped.
#[derive(Debug)]
pub struct ResourcePool<R> {
    free: Vec<R>,
    capacity: usize,
}

impl<R> ResourcePool<R> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
        }
    }

    /// Take a recycled resource if one is available.
    pub fn acquire(&mut self) -> Option<R> {
        self.free.pop()
    }

    /// Return a resource to the pool. Dropped when the pool is at capacity.
    pub fn release(&mut self, resource: R) {
        if self.free.len() < self.capacity {
            self.free.push(resource);
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
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
    fn test_release_then_acquire_recycles() {
        let mut pool: ResourcePool<u32> = ResourcePool::new(2);
        assert!(pool.acquire().is_none());
        pool.release(7);
        assert_eq!(pool.acquire(), Some(7));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut pool: ResourcePool<u32> = ResourcePool::new(2);
        pool.release(1);
        pool.release(2);
        pool.release(3);
        assert_eq!(pool.len(), 2);
    }
}
