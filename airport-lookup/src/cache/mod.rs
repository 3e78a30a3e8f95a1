//! Bounded least-recently-used caches.
//!
//! [`LruStore`] is the seam: callers only need `get` and `set`, and can be
//! handed an in-memory [`MemoryLru`] or a disk-backed [`PersistentLru`]
//! without changing. Neither operation can fail; persistence problems are
//! absorbed by the store.

mod config;
mod error;
mod memory;
mod persistent;

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use config::{AIRPORT_SEARCH_NAMESPACE, CacheConfig, DEFAULT_CAPACITY};
pub use error::CacheError;
pub use memory::MemoryLru;
pub use persistent::PersistentLru;

/// A bounded key-value store with least-recently-used eviction.
pub trait LruStore<V> {
    /// Return the value for `key` and mark it most recently used.
    fn get(&mut self, key: &str) -> Option<V>;

    /// Store `value` under `key`, evicting the least recently used entry
    /// if the store is full. An existing value for `key` is replaced.
    fn set(&mut self, key: String, value: V);

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, fixed at construction.
    fn capacity(&self) -> NonZeroUsize;

    /// Write any unsaved state to backing storage. No-op for stores
    /// without one.
    fn flush(&mut self) {}
}

/// An [`LruStore`] shareable across request handlers.
///
/// Access is serialized through a mutex; each operation runs to completion
/// while holding it.
pub struct SharedLru<V> {
    inner: Mutex<Box<dyn LruStore<V> + Send>>,
}

impl<V> SharedLru<V> {
    pub fn new(store: impl LruStore<V> + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Box::new(store)),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.lock().set(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().capacity()
    }

    /// Write unsaved recency changes; call before shutdown.
    pub fn flush(&self) {
        self.lock().flush();
    }

    // A panic mid-operation cannot leave the LRU structurally broken, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Box<dyn LruStore<V> + Send>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> std::fmt::Debug for SharedLru<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLru")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
