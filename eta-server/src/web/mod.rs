//! Web layer for the station arrival service.
//!
//! JSON endpoints for finding the nearest station, listing the lines that
//! serve it and fetching arrival estimates.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, cors_layer, create_router};
pub use state::AppState;
