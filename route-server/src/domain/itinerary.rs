//! Candidate itineraries as produced by the source adapters.
//!
//! Every source, whatever its response shape, is normalized into a
//! `CandidateItinerary` at the adapter boundary. Downstream stages never
//! branch on where an itinerary came from except through `ModeDetails`.

use serde::Serialize;

use super::{Leg, Mode, StationMatch, VehicleMatch};

/// Source-specific extras carried alongside the common shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModeDetails {
    Transit {
        transfers: u32,
        walk_distance_m: f64,
    },
    BikeShare {
        start_station: StationMatch,
        /// Return station near the destination, when one is in range.
        dest_station: Option<StationMatch>,
    },
    ScooterShare {
        scooter: VehicleMatch,
        /// Other vehicles near the origin, nearest first.
        nearby: Vec<VehicleMatch>,
    },
}

/// One raw itinerary from a single mode's source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateItinerary {
    pub mode: Mode,
    pub legs: Vec<Leg>,
    pub summary: String,
    /// Total duration; `None` when the source did not report one.
    pub duration_minutes: Option<f64>,
    pub cost_chf: Option<f64>,
    pub warning: Option<String>,
    pub details: ModeDetails,
}

impl CandidateItinerary {
    /// True if every leg is a walk.
    ///
    /// An empty itinerary is not walk-only; it is malformed.
    pub fn is_walk_only(&self) -> bool {
        !self.legs.is_empty() && self.legs.iter().all(|l| l.mode.is_walk())
    }

    /// Number of non-walking legs.
    pub fn ride_count(&self) -> usize {
        self.legs.iter().filter(|l| !l.mode.is_walk()).count()
    }
}
