//! Server configuration from the environment.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::cache::DEFAULT_CAPACITY;

/// Runtime settings for the airport server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// JSON file holding the airport dataset (`AIRPORTS_DATA`).
    pub data_path: PathBuf,

    /// Directory for persisted caches (`AIRPORT_CACHE_DIR`).
    pub cache_dir: PathBuf,

    /// Maximum cached searches (`AIRPORT_SEARCH_CACHE_SIZE`).
    pub search_cache_size: NonZeroUsize,

    /// Listen address (`AIRPORT_BIND_ADDR`).
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/airports.json"),
            cache_dir: PathBuf::from(".cache"),
            search_cache_size: DEFAULT_CAPACITY,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl ServerConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read settings through `var`, falling back to defaults for unset or
    /// unparseable values.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            data_path: var("AIRPORTS_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            cache_dir: var("AIRPORT_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            search_cache_size: parse_or(
                &var,
                "AIRPORT_SEARCH_CACHE_SIZE",
                defaults.search_cache_size,
            ),
            bind_addr: parse_or(&var, "AIRPORT_BIND_ADDR", defaults.bind_addr),
        }
    }
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    let Some(raw) = var(name) else {
        return default;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        warn!(var = name, value = %raw, "invalid setting; using default");
        default
    })
}
