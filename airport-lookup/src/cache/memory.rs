//! In-memory LRU store.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::trace;

use super::LruStore;

/// Bounded in-memory LRU cache with no persistence.
#[derive(Debug)]
pub struct MemoryLru<V> {
    entries: LruCache<String, V>,
}

impl<V> MemoryLru<V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Check for a key without changing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Entries ordered from least to most recently used.
    pub fn iter_lru_first(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().rev().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert, returning the key evicted to make room (if any).
    ///
    /// Replacing an existing key never evicts.
    pub(crate) fn insert(&mut self, key: String, value: V) -> Option<String> {
        match self.entries.push(key, value) {
            Some((old_key, _)) if !self.entries.contains(&old_key) => Some(old_key),
            _ => None,
        }
    }
}

impl<V: Clone> LruStore<V> for MemoryLru<V> {
    fn get(&mut self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: String, value: V) {
        if let Some(evicted) = self.insert(key, value) {
            trace!(key = %evicted, "evicted least recently used entry");
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }
}
