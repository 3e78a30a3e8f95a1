//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Airport;

/// Query parameters for free-text airport search.
#[derive(Debug, Deserialize)]
pub struct AirportSearchRequest {
    /// Search text
    pub q: String,

    /// Maximum results (defaults to 10, capped at 50)
    pub limit: Option<usize>,
}

/// Search results.
#[derive(Debug, Serialize)]
pub struct AirportSearchResponse {
    pub airports: Vec<Airport>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
