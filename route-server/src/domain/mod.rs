//! Domain types for the multimodal route planner.
//!
//! This module contains the core domain model: validated coordinates,
//! modes, raw itineraries as produced by the sources, live inventory
//! snapshots, and the segmented result. Types that carry invariants
//! enforce them at construction time.

mod coordinate;
mod error;
mod inventory;
mod itinerary;
mod leg;
mod mode;
mod route;
mod trip;

pub use coordinate::{Coordinate, EARTH_RADIUS_M, InvalidCoordinate};
pub use error::DomainError;
pub use inventory::{StationMatch, StationSnapshot, VehicleMatch, VehicleSnapshot};
pub use itinerary::{CandidateItinerary, ModeDetails};
pub use leg::{Leg, LegMode, PlaceKind};
pub use mode::{Mode, UnknownMode};
pub use route::{
    Alternative, AlternativeRef, Badge, ModeStatus, RouteResult, Segment, SegmentedItinerary,
    TransferPoint,
};
pub use trip::TripRequest;
