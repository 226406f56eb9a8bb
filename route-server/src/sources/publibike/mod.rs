//! PubliBike bike-share adapter.
//!
//! The station directory (ids, names, positions, state) changes rarely and
//! is cached; occupancy comes from per-station detail requests made fresh
//! for every planning request, and only for stations inside the search area.

mod client;
mod types;

pub use client::{PubliBikeClient, PubliBikeConfig};
pub use types::{StationDto, StationStateDto, VehicleDto, VehicleTypeDto};
