//! Web layer for the multimodal route planner.
//!
//! Provides HTTP endpoints for listing modes and planning routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
