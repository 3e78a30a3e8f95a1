//! Cache configuration.

use std::num::NonZeroUsize;

use super::error::CacheError;

/// Namespace of the airport search result cache.
pub const AIRPORT_SEARCH_NAMESPACE: &str = "airport-search";

/// Default maximum number of cached searches.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Configuration for an LRU cache.
///
/// The namespace isolates this cache's persisted entries from other caches
/// sharing the same directory. Capacity is fixed once the cache is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub capacity: NonZeroUsize,

    /// Partition name, also the snapshot file stem.
    namespace: String,
}

impl CacheConfig {
    /// Create a config with the given namespace and the default capacity (100).
    ///
    /// Namespaces are restricted to ASCII letters, digits, `-`, `_` and `.`,
    /// and may not start with `.`.
    pub fn new(namespace: impl Into<String>) -> Result<Self, CacheError> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self {
            capacity: DEFAULT_CAPACITY,
            namespace,
        })
    }

    /// Config for the airport search cache.
    pub fn airport_search() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            namespace: AIRPORT_SEARCH_NAMESPACE.to_string(),
        }
    }

    /// Set a custom capacity.
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

fn validate_namespace(namespace: &str) -> Result<(), CacheError> {
    let invalid = |reason| CacheError::InvalidNamespace {
        namespace: namespace.to_string(),
        reason,
    };

    if namespace.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if namespace.starts_with('.') {
        return Err(invalid("must not start with '.'"));
    }
    if !namespace
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        return Err(invalid("must be ASCII letters, digits, '-', '_' or '.'"));
    }

    Ok(())
}
