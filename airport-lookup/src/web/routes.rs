//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::airports::MAX_SEARCH_RESULTS;
use crate::domain::{Airport, Iata, Icao, InvalidCode};

use super::dto::*;
use super::state::AppState;

/// Results returned when a search gives no limit.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/airports/icao/:code", get(airport_by_icao))
        .route("/airports/iata/:code", get(airport_by_iata))
        .route("/airports/search", get(search_airports))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Look up an airport by ICAO code.
async fn airport_by_icao(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Airport>, AppError> {
    let icao = Icao::parse_normalized(&code)?;
    state
        .airports
        .by_icao(icao.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("no airport with ICAO code {icao}"),
        })
}

/// Look up an airport by IATA code.
async fn airport_by_iata(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Airport>, AppError> {
    let iata = Iata::parse_normalized(&code)?;
    state
        .airports
        .by_iata(iata.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("no airport with IATA code {iata}"),
        })
}

/// Search airports by code, name or country.
///
/// A cache miss writes the snapshot to disk, so the search runs on the
/// blocking pool.
async fn search_airports(
    State(state): State<AppState>,
    Query(req): Query<AirportSearchRequest>,
) -> Result<Json<AirportSearchResponse>, AppError> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_RESULTS);
    let airports = state.airports.clone();
    let airports = tokio::task::spawn_blocking(move || airports.search(&req.q, limit))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("search task failed: {e}"),
        })?;

    Ok(Json(AirportSearchResponse { airports }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidCode> for AppError {
    fn from(e: InvalidCode) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status == StatusCode::BAD_REQUEST {
            warn!(%status, %message, "rejected request");
        } else if status.is_server_error() {
            error!(%status, %message, "request failed");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
