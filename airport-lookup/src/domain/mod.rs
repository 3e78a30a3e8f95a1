//! Domain types for airport lookup.
//!
//! Airport codes are validated at construction, so code that receives an
//! `Icao` or `Iata` can trust its format.

mod airport;
mod codes;

pub use airport::Airport;
pub use codes::{Iata, Icao, InvalidCode};
