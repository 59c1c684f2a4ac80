//! Web layer for the bike-share rebalancing service.
//!
//! Provides HTTP endpoints for the classified station listing and for
//! routing between two points.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
