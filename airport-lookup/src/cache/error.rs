//! Cache error types.
//!
//! These never reach callers of `get`/`set`; persistence failures are
//! logged and the cache degrades to memory-only.

use std::path::PathBuf;

/// Errors from cache configuration and snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Namespace cannot be used as a snapshot file name
    #[error("invalid cache namespace {namespace:?}: {reason}")]
    InvalidNamespace {
        namespace: String,
        reason: &'static str,
    },

    /// Reading or writing the snapshot file failed
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be (de)serialized
    #[error("cache snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
