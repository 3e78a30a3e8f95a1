//! Airport lookup context.
//!
//! [`Airports`] bundles the read-only dataset with the search result cache
//! and is constructed once at startup, then shared by request handlers.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheConfig, MemoryLru, PersistentLru, SharedLru};
use crate::dataset::AirportDataset;
use crate::domain::Airport;

/// Most matches kept per search, and the most a caller can ask for.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Cache of search query to matching airports.
pub type AirportSearchCache = SharedLru<Vec<Airport>>;

/// Dataset plus search cache.
#[derive(Debug, Clone)]
pub struct Airports {
    dataset: Arc<AirportDataset>,
    search_cache: Arc<AirportSearchCache>,
}

impl Airports {
    pub fn new(dataset: AirportDataset, search_cache: AirportSearchCache) -> Self {
        Self {
            dataset: Arc::new(dataset),
            search_cache: Arc::new(search_cache),
        }
    }

    /// Use a memory-only search cache.
    pub fn in_memory(dataset: AirportDataset, config: &CacheConfig) -> Self {
        Self::new(dataset, SharedLru::new(MemoryLru::new(config.capacity)))
    }

    /// Use a search cache persisted under `cache_dir`.
    pub fn persistent(
        dataset: AirportDataset,
        cache_dir: impl AsRef<Path>,
        config: &CacheConfig,
    ) -> Self {
        Self::new(
            dataset,
            SharedLru::new(PersistentLru::open(cache_dir, config)),
        )
    }

    /// Look up an airport by exact ICAO code.
    pub fn by_icao(&self, code: &str) -> Option<&Airport> {
        self.dataset.by_icao(code)
    }

    /// Look up an airport by exact IATA code.
    pub fn by_iata(&self, code: &str) -> Option<&Airport> {
        self.dataset.by_iata(code)
    }

    pub fn dataset(&self) -> &AirportDataset {
        &self.dataset
    }

    pub fn search_cache(&self) -> &AirportSearchCache {
        &self.search_cache
    }

    /// Free-text search over codes, names and countries.
    ///
    /// Results are ordered: exact ICAO/IATA match, then names starting with
    /// the query, then names or countries containing it. The full match
    /// list (up to [`MAX_SEARCH_RESULTS`]) is cached under the normalized
    /// query; `limit` only truncates the returned copy.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Airport> {
        let key = normalize_query(query);
        if key.is_empty() {
            return Vec::new();
        }

        let mut results = match self.search_cache.get(&key) {
            Some(cached) => {
                debug!(query = %key, count = cached.len(), "airport search cache hit");
                cached
            }
            None => {
                let matches = find_matches(&self.dataset, &key);
                debug!(query = %key, count = matches.len(), "airport search cache miss");
                self.search_cache.set(key, matches.clone());
                matches
            }
        };

        results.truncate(limit);
        results
    }
}

/// Cache key for a query: trimmed and lowercased.
fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Rank matches for an already-normalized needle.
fn find_matches(dataset: &AirportDataset, needle: &str) -> Vec<Airport> {
    let airports = dataset.airports();
    let mut taken = vec![false; airports.len()];
    let mut ranked = Vec::new();

    let tiers: [&dyn Fn(&Airport) -> bool; 3] = [
        &|a: &Airport| {
            a.icao.as_str().eq_ignore_ascii_case(needle)
                || a.iata.is_some_and(|c| c.as_str().eq_ignore_ascii_case(needle))
        },
        &|a: &Airport| a.name.to_lowercase().starts_with(needle),
        &|a: &Airport| {
            a.name.to_lowercase().contains(needle) || a.country.to_lowercase().contains(needle)
        },
    ];

    for matches in tiers {
        for (i, airport) in airports.iter().enumerate() {
            if ranked.len() == MAX_SEARCH_RESULTS {
                return ranked;
            }
            if !taken[i] && matches(airport) {
                taken[i] = true;
                ranked.push(airport.clone());
            }
        }
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{airport, sample_dataset};
    use std::num::NonZeroUsize;

    fn airports() -> Airports {
        Airports::in_memory(sample_dataset(), &CacheConfig::airport_search())
    }

    fn names(results: &[Airport]) -> Vec<&str> {
        results.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn code_lookups_share_records() {
        let airports = airports();
        let by_icao = airports.by_icao("KJFK").unwrap();
        let by_iata = airports.by_iata("JFK").unwrap();
        assert_eq!(by_icao, by_iata);
        assert!(airports.by_icao("ZZZZ").is_none());
    }

    #[test]
    fn search_ranks_code_then_prefix_then_substring() {
        let airports = Airports::in_memory(
            AirportDataset::new(vec![
                airport("Greater Lhr Field", "Nowhere", "XAAA", None),
                airport("Lhr Regional", "Nowhere", "XBBB", None),
                airport("London Heathrow", "United Kingdom", "EGLL", Some("LHR")),
            ]),
            &CacheConfig::airport_search(),
        );

        let results = airports.search("LHR", 10);
        assert_eq!(
            names(&results),
            vec!["London Heathrow", "Lhr Regional", "Greater Lhr Field"]
        );
    }

    #[test]
    fn search_matches_country() {
        let results = airports().search("united kingdom", 10);
        assert_eq!(
            names(&results),
            vec!["London Heathrow", "London Gatwick", "Barra", "Unst Airstrip"]
        );
    }

    #[test]
    fn search_is_case_and_whitespace_insensitive() {
        let airports = airports();
        let a = airports.search("  LONDON ", 10);
        let b = airports.search("london", 10);
        assert_eq!(a, b);
        assert_eq!(names(&a), vec!["London Heathrow", "London Gatwick"]);
    }

    #[test]
    fn search_populates_cache_under_normalized_key() {
        let airports = airports();
        assert!(airports.search_cache().is_empty());

        airports.search("  Newark ", 10);

        assert_eq!(airports.search_cache().len(), 1);
        let cached = airports.search_cache().get("newark").unwrap();
        assert_eq!(names(&cached), vec!["Newark Liberty Intl"]);
    }

    #[test]
    fn search_serves_cached_results() {
        let airports = airports();
        let planted = vec![airport("Planted", "Testland", "TEST", None)];
        airports.search_cache().set("anything", planted.clone());

        assert_eq!(airports.search("Anything", 10), planted);
    }

    #[test]
    fn limit_truncates_without_shrinking_cache() {
        let airports = airports();
        let results = airports.search("united", 2);
        assert_eq!(results.len(), 2);

        let cached = airports.search_cache().get("united").unwrap();
        assert_eq!(cached.len(), 6);
    }

    #[test]
    fn empty_query_is_not_cached() {
        let airports = airports();
        assert!(airports.search("   ", 10).is_empty());
        assert!(airports.search_cache().is_empty());
    }

    #[test]
    fn no_match_is_cached_as_empty() {
        let airports = airports();
        assert!(airports.search("atlantis", 10).is_empty());
        assert_eq!(airports.search_cache().get("atlantis"), Some(vec![]));
    }

    #[test]
    fn search_cache_respects_capacity() {
        let config =
            CacheConfig::airport_search().with_capacity(NonZeroUsize::new(2).unwrap());
        let airports = Airports::in_memory(sample_dataset(), &config);

        airports.search("london", 10);
        airports.search("barra", 10);
        airports.search("newark", 10);

        assert_eq!(airports.search_cache().len(), 2);
        assert!(airports.search_cache().get("london").is_none());
    }

    #[test]
    fn matches_are_capped() {
        let many = (0..MAX_SEARCH_RESULTS + 10)
            .map(|i| airport(&format!("Field {i}"), "Testland", &format!("X{i:03}"), None))
            .collect();
        let airports = Airports::in_memory(
            AirportDataset::new(many),
            &CacheConfig::airport_search(),
        );

        assert_eq!(airports.search("field", usize::MAX).len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn persisted_searches_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::airport_search();
        {
            let airports = Airports::persistent(sample_dataset(), dir.path(), &config);
            airports.search("gatwick", 10);
        }

        let airports = Airports::persistent(sample_dataset(), dir.path(), &config);
        let cached = airports.search_cache().get("gatwick").unwrap();
        assert_eq!(names(&cached), vec!["London Gatwick"]);
        assert!(dir.path().join("airport-search.json").exists());
    }
}
