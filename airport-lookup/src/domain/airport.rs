//! The airport record.

use serde::{Deserialize, Serialize};

use super::{Iata, Icao};

/// An airport record from the static dataset.
///
/// Records are created once when the dataset is loaded and never mutated.
/// The serialized field names match the dataset file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Display name
    pub name: String,

    pub country: String,

    pub continent: String,

    /// UTC offset in hours
    pub tz: f64,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lon: f64,

    /// IATA code, absent for many smaller airports
    #[serde(rename = "IATA")]
    pub iata: Option<Iata>,

    /// ICAO code, the stable identifier
    #[serde(rename = "ICAO")]
    pub icao: Icao,

    /// External reference (Wikipedia URI)
    #[serde(default)]
    pub wiki: Option<String>,
}
