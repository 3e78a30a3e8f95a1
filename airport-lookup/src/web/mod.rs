//! HTTP surface for airport lookup and search.

mod dto;
mod routes;
mod server;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;
