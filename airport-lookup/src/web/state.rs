//! Application state for the web layer.

use crate::airports::Airports;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Dataset and search cache
    pub airports: Airports,
}

impl AppState {
    pub fn new(airports: Airports) -> Self {
        Self { airports }
    }
}
