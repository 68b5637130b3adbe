//! Web layer for the transit server.
//!
//! Provides HTTP endpoints for station lookup, path finding and the
//! arrival and wait-time simulations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
