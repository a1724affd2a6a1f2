//! Bounded in-memory caches for previews and tile sheets.
//!
//! Entries are evicted in insertion order, a batch at a time: when a new key
//! arrives at a full cache, the `eviction_batch` oldest keys are dropped
//! before it is stored. The cache never holds more than `capacity` entries.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use image::DynamicImage;

/// Cropped thumbnails keyed by the exact requested position in milliseconds.
pub type PreviewCache = OrderedCache<u64, Arc<DynamicImage>>;

/// Decoded tile sheets keyed by sheet index.
pub type SheetCache = OrderedCache<u64, Arc<DynamicImage>>;

struct Inner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

/// Thread-safe, insertion-ordered cache with batch eviction.
pub struct OrderedCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    capacity: usize,
    eviction_batch: usize,
}

impl<K, V> OrderedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache. `capacity` is raised to at least 1 and
    /// `eviction_batch` is clamped to `1..=capacity`.
    pub fn new(capacity: usize, eviction_batch: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
            eviction_batch: eviction_batch.clamp(1, capacity),
        }
    }

    /// Get an entry if it exists in cache.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// Insert an entry, returning how many entries were evicted to make room.
    ///
    /// Re-inserting an existing key replaces its value and keeps its position.
    pub fn put(&self, key: K, value: V) -> usize {
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = value;
            return 0;
        }

        let mut evicted = 0;
        if inner.entries.len() >= self.capacity {
            while evicted < self.eviction_batch {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
                evicted += 1;
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
        evicted
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().order.iter().cloned().collect()
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        // Default: 20 entries, drop 5 at a time
        Self::new(20, 5)
    }
}
