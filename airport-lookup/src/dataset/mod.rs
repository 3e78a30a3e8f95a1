//! The in-memory airport dataset and lookup by code.
//!
//! The dataset is small (low thousands of records), so lookups are a
//! linear scan in dataset order and no index is built.

mod error;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{Airport, Iata, Icao};

pub use error::DatasetError;

/// A code that appears on more than one record.
///
/// Lookups resolve duplicates to the first record in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateCode {
    Icao(Icao),
    Iata(Iata),
}

/// Read-only, ordered collection of airport records.
#[derive(Debug, Clone, Default)]
pub struct AirportDataset {
    airports: Vec<Airport>,
    duplicates: Vec<DuplicateCode>,
}

impl AirportDataset {
    /// Create a dataset from records in their canonical order.
    ///
    /// Duplicate ICAO or IATA codes are logged and recorded, not rejected.
    pub fn new(airports: Vec<Airport>) -> Self {
        let duplicates = find_duplicates(&airports);
        for dup in &duplicates {
            warn!(?dup, "duplicate airport code in dataset; lookups return the first match");
        }

        Self {
            airports,
            duplicates,
        }
    }

    /// Load a dataset from a JSON array file.
    ///
    /// Rows that are not valid airports (for example a malformed ICAO code)
    /// are logged and skipped. Only an unreadable file or a document that is
    /// not a JSON array fails the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|source| DatasetError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let total = rows.len();
        let airports = parse_rows(rows);
        debug!(
            path = %path.display(),
            count = airports.len(),
            skipped = total - airports.len(),
            "loaded airport dataset"
        );
        Ok(Self::new(airports))
    }

    /// Find the airport with the given ICAO code.
    pub fn by_icao(&self, code: &str) -> Option<&Airport> {
        self.airports.iter().find(|a| a.icao.as_str() == code)
    }

    /// Find the airport with the given IATA code.
    ///
    /// Airports without an IATA code never match.
    pub fn by_iata(&self, code: &str) -> Option<&Airport> {
        self.airports
            .iter()
            .find(|a| a.iata.is_some_and(|iata| iata.as_str() == code))
    }

    /// Codes shared by more than one record, in order of first repetition.
    pub fn duplicate_codes(&self) -> &[DuplicateCode] {
        &self.duplicates
    }

    /// All records in dataset order.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

/// Convert raw rows to airports, dropping rows that fail to parse.
fn parse_rows(rows: Vec<serde_json::Value>) -> Vec<Airport> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<Airport>(row) {
            Ok(airport) => Some(airport),
            Err(e) => {
                warn!(index, error = %e, "skipping invalid airport row");
                None
            }
        })
        .collect()
}

fn find_duplicates(airports: &[Airport]) -> Vec<DuplicateCode> {
    let mut seen_icao = HashSet::new();
    let mut seen_iata = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for airport in airports {
        if !seen_icao.insert(airport.icao) {
            let dup = DuplicateCode::Icao(airport.icao);
            if reported.insert(dup) {
                duplicates.push(dup);
            }
        }
        if let Some(iata) = airport.iata
            && !seen_iata.insert(iata)
        {
            let dup = DuplicateCode::Iata(iata);
            if reported.insert(dup) {
                duplicates.push(dup);
            }
        }
    }

    duplicates
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build an airport with placeholder coordinates.
    pub fn airport(name: &str, country: &str, icao: &str, iata: Option<&str>) -> Airport {
        Airport {
            name: name.to_string(),
            country: country.to_string(),
            continent: "XX".to_string(),
            tz: 0.0,
            lat: 0.0,
            lon: 0.0,
            iata: iata.map(|c| Iata::parse(c).unwrap()),
            icao: Icao::parse(icao).unwrap(),
            wiki: None,
        }
    }

    pub fn sample_dataset() -> AirportDataset {
        AirportDataset::new(vec![
            airport("John F. Kennedy Intl", "United States", "KJFK", Some("JFK")),
            airport("London Heathrow", "United Kingdom", "EGLL", Some("LHR")),
            airport("London Gatwick", "United Kingdom", "EGKK", Some("LGW")),
            airport("Newark Liberty Intl", "United States", "KEWR", Some("EWR")),
            airport("Barra", "United Kingdom", "EGPR", Some("BRR")),
            airport("Unst Airstrip", "United Kingdom", "EGPW", None),
        ])
    }
}
