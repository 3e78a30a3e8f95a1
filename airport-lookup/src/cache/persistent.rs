//! LRU store mirrored to a JSON snapshot on disk.
//!
//! The snapshot lives at `<dir>/<namespace>.json` and lists entries from
//! least to most recently used, so replaying it in order restores recency.
//! Any I/O failure switches the store to memory-only for the rest of the
//! process; callers of `get`/`set` never see an error.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::LruStore;
use super::config::CacheConfig;
use super::error::CacheError;
use super::memory::MemoryLru;

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<E> {
    namespace: String,
    /// Unix timestamp when the snapshot was written.
    saved_at_secs: u64,
    /// Entries, least recently used first.
    entries: Vec<E>,
}

/// LRU cache whose contents survive process restarts.
#[derive(Debug)]
pub struct PersistentLru<V: Serialize> {
    memory: MemoryLru<V>,
    namespace: String,
    /// Snapshot file; `None` once persistence has been disabled.
    path: Option<PathBuf>,
    /// Recency changed since the last write.
    dirty: bool,
}

impl<V: Clone + Serialize + DeserializeOwned> PersistentLru<V> {
    /// Open the cache for `config.namespace()` inside `dir`.
    ///
    /// A missing snapshot starts empty. An unreadable or corrupt snapshot is
    /// logged and ignored. Entries beyond the configured capacity are
    /// dropped, oldest first.
    pub fn open(dir: impl AsRef<Path>, config: &CacheConfig) -> Self {
        let path = dir.as_ref().join(format!("{}.json", config.namespace()));
        let mut memory = MemoryLru::new(config.capacity);

        match read_snapshot::<V>(&path) {
            Ok(Some(snapshot)) if snapshot.namespace == config.namespace() => {
                let count = snapshot.entries.len();
                for (key, value) in snapshot.entries {
                    memory.insert(key, value);
                }
                debug!(
                    namespace = config.namespace(),
                    count,
                    loaded = memory.len(),
                    "restored cache snapshot"
                );
            }
            Ok(Some(snapshot)) => {
                warn!(
                    path = %path.display(),
                    expected = config.namespace(),
                    found = %snapshot.namespace,
                    "cache snapshot belongs to another namespace; starting empty"
                );
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable cache snapshot"),
        }

        Self {
            memory,
            namespace: config.namespace().to_string(),
            path: Some(path),
            dirty: false,
        }
    }

    /// Whether writes still go to disk.
    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    /// Snapshot file path, if persistence is still enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the snapshot, disabling persistence on failure.
    fn persist(&mut self) {
        let Some(path) = &self.path else {
            return;
        };

        match write_snapshot(path, &self.namespace, &self.memory) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!(
                    namespace = %self.namespace,
                    error = %e,
                    "cache persistence failed; continuing in memory only"
                );
                self.path = None;
            }
        }
    }
}

impl<V: Clone + Serialize + DeserializeOwned> LruStore<V> for PersistentLru<V> {
    fn get(&mut self, key: &str) -> Option<V> {
        let value = self.memory.get(key);
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    fn set(&mut self, key: String, value: V) {
        self.memory.set(key, value);
        self.dirty = true;
        self.persist();
    }

    fn len(&self) -> usize {
        self.memory.len()
    }

    fn capacity(&self) -> NonZeroUsize {
        self.memory.capacity()
    }

    /// Write the snapshot if recency changed since the last write.
    fn flush(&mut self) {
        if self.dirty {
            self.persist();
        }
    }
}

impl<V: Serialize> Drop for PersistentLru<V> {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        if let Some(path) = &self.path
            && let Err(e) = write_snapshot(path, &self.namespace, &self.memory)
        {
            warn!(namespace = %self.namespace, error = %e, "failed to flush cache on drop");
        }
    }
}

/// Read a snapshot. Returns `Ok(None)` if the file does not exist.
fn read_snapshot<V: DeserializeOwned>(
    path: &Path,
) -> Result<Option<Snapshot<(String, V)>>, CacheError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    Ok(Some(serde_json::from_str(&contents)?))
}

/// Write the snapshot via a temporary file and rename.
///
/// Creates the parent directory if needed.
fn write_snapshot<V: Serialize>(
    path: &Path,
    namespace: &str,
    memory: &MemoryLru<V>,
) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let saved_at_secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let snapshot = Snapshot {
        namespace: namespace.to_string(),
        saved_at_secs,
        entries: memory.iter_lru_first().collect(),
    };
    let json = serde_json::to_string(&snapshot)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(namespace: &str, capacity: usize) -> CacheConfig {
        CacheConfig::new(namespace)
            .unwrap()
            .with_capacity(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn set_writes_snapshot_file() {
        let dir = tempdir().unwrap();
        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 10));

        cache.set("a".into(), vec![1, 2]);

        let path = dir.path().join("numbers.json");
        assert_eq!(cache.path(), Some(path.as_path()));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"namespace\":\"numbers\""));
        assert!(contents.contains("[\"a\",[1,2]]"));
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut cache = PersistentLru::open(dir.path(), &config("numbers", 10));
            cache.set("a".into(), vec![1]);
            cache.set("b".into(), vec![2]);
        }

        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 10));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(vec![1]));
        assert_eq!(cache.get("b"), Some(vec![2]));
    }

    #[test]
    fn recency_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut cache = PersistentLru::open(dir.path(), &config("numbers", 2));
            cache.set("a".into(), vec![1]);
            cache.set("b".into(), vec![2]);
            // Promote "a"; written on drop
            assert!(cache.get("a").is_some());
        }

        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 2));
        cache.set("c".into(), vec![3]);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(vec![1]));
        assert_eq!(cache.get("c"), Some(vec![3]));
    }

    #[test]
    fn reopen_with_smaller_capacity_keeps_most_recent() {
        let dir = tempdir().unwrap();
        {
            let mut cache = PersistentLru::open(dir.path(), &config("numbers", 5));
            for i in 0..5u32 {
                cache.set(format!("k{i}"), vec![i]);
            }
        }

        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 2));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity().get(), 2);
        assert_eq!(cache.get("k3"), Some(vec![3]));
        assert_eq!(cache.get("k4"), Some(vec![4]));
    }

    #[test]
    fn namespaces_are_isolated() {
        let dir = tempdir().unwrap();
        let mut first = PersistentLru::open(dir.path(), &config("first", 10));
        let mut second = PersistentLru::open(dir.path(), &config("second", 10));

        first.set("key".into(), vec![1u32]);
        second.set("key".into(), vec![2u32]);
        drop(first);
        drop(second);

        let mut first = PersistentLru::<Vec<u32>>::open(dir.path(), &config("first", 10));
        let mut second = PersistentLru::<Vec<u32>>::open(dir.path(), &config("second", 10));
        assert_eq!(first.get("key"), Some(vec![1]));
        assert_eq!(second.get("key"), Some(vec![2]));
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("numbers.json"), "{ definitely not json").unwrap();

        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 10));
        assert_eq!(cache.len(), 0);
        assert!(cache.is_persistent());

        cache.set("a".into(), vec![1]);
        drop(cache);

        let cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn snapshot_from_other_namespace_is_ignored() {
        let dir = tempdir().unwrap();
        {
            let mut cache = PersistentLru::open(dir.path(), &config("numbers", 10));
            cache.set("a".into(), vec![1u32]);
        }
        std::fs::rename(dir.path().join("numbers.json"), dir.path().join("other.json")).unwrap();

        let cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("other", 10));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn unwritable_directory_degrades_to_memory() {
        let dir = tempdir().unwrap();
        // A regular file where the cache directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut cache = PersistentLru::open(blocker.join("cache"), &config("numbers", 10));
        cache.set("a".into(), vec![1u32]);

        assert!(!cache.is_persistent());
        assert_eq!(cache.get("a"), Some(vec![1]));

        cache.set("b".into(), vec![2u32]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn creates_cache_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("cache");

        let mut cache = PersistentLru::open(&nested, &config("numbers", 10));
        cache.set("a".into(), vec![1u32]);

        assert!(nested.join("numbers.json").exists());
        assert!(!nested.join("numbers.json.tmp").exists());
    }

    #[test]
    fn flush_persists_promotion_without_drop() {
        let dir = tempdir().unwrap();
        let mut cache = PersistentLru::open(dir.path(), &config("numbers", 2));
        cache.set("a".into(), vec![1u32]);
        cache.set("b".into(), vec![2u32]);
        assert!(cache.get("a").is_some());

        cache.flush();
        // Simulate a killed process: no Drop flush
        std::mem::forget(cache);

        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 2));
        cache.set("c".into(), vec![3]);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(vec![1]));
        assert_eq!(cache.get("c"), Some(vec![3]));
    }

    #[test]
    fn flush_without_changes_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut cache = PersistentLru::<Vec<u32>>::open(dir.path(), &config("numbers", 10));

        cache.flush();
        drop(cache);

        assert!(!dir.path().join("numbers.json").exists());
    }
}
