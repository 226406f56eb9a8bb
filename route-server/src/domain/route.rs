//! Segmented itineraries and the final planning result.
//!
//! A `SegmentedItinerary` is a candidate itinerary cut into segments at
//! its transfer points, each segment optionally carrying ranked
//! alternatives. A `RouteResult` collects them for one request together
//! with the per-mode warnings.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CandidateItinerary, Coordinate, Leg, LegMode, Mode, StationMatch, VehicleMatch};

/// A place in an itinerary where the traveller could switch mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPoint {
    pub name: String,
    pub location: Coordinate,
    /// Only transit stops and bike-share stations are station-backed.
    pub is_station_backed: bool,
    /// Position within the itinerary's transfer points.
    pub index: usize,
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
}

/// Threshold-based hints for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Fast,
    Affordable,
}

/// The station or vehicle an alternative relies on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeRef {
    Station {
        start: StationMatch,
        dest: Option<StationMatch>,
    },
    Vehicle(VehicleMatch),
}

/// A substitute way to finish the trip from a transfer point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub mode: Mode,
    pub summary: String,
    pub duration_minutes: f64,
    pub cost_chf: Option<f64>,
    pub distance_km: Option<f64>,
    pub reference: Option<AlternativeRef>,
    /// Lower is better.
    pub rank_score: f64,
    pub badges: Vec<Badge>,
}

/// A merged, presentation-level stretch between two transfer points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Stable label within the itinerary ("seg-1", "seg-2", ...).
    pub id: String,
    pub from: TransferPoint,
    pub to: TransferPoint,
    /// The segment's ride mode, or `Walk` for walk-only segments.
    pub mode: LegMode,
    pub duration_minutes: f64,
    pub distance_meters: f64,
    pub line_name: Option<String>,
    /// The raw legs this segment covers, in order.
    pub legs: Vec<Leg>,
    pub alternatives: Vec<Alternative>,
}

/// A candidate itinerary with its transfer points and segments.
///
/// # Invariants
///
/// - `transfer_points` has `segments.len() + 1` entries
/// - segment `i` runs from transfer point `i` to transfer point `i + 1`
/// - the segments' legs, concatenated, equal `itinerary.legs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentedItinerary {
    pub itinerary: CandidateItinerary,
    pub transfer_points: Vec<TransferPoint>,
    pub segments: Vec<Segment>,
}

impl SegmentedItinerary {
    pub fn mode(&self) -> Mode {
        self.itinerary.mode
    }

    /// Whether any segment offers an alternative.
    pub fn has_alternatives(&self) -> bool {
        self.segments.iter().any(|s| !s.alternatives.is_empty())
    }

    /// Number of intermediate transfer points (origin and destination excluded).
    pub fn transfer_count(&self) -> usize {
        self.transfer_points.len().saturating_sub(2)
    }

    /// All legs in segment order.
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.segments.iter().flat_map(|s| s.legs.iter())
    }
}

/// Availability of one requested mode in a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeStatus {
    /// Itineraries present, no warning.
    Present,
    /// Itineraries present, but something was dropped or is incomplete.
    Degraded,
    /// No itinerary for this mode.
    Absent,
}

/// Everything the planner returns for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteResult {
    pub itineraries: Vec<SegmentedItinerary>,
    pub warnings: BTreeMap<Mode, String>,
    /// Modes the caller enabled.
    pub requested: BTreeSet<Mode>,
}

impl RouteResult {
    /// Record a warning for a mode, appending to any existing one.
    pub fn warn(&mut self, mode: Mode, message: impl Into<String>) {
        let message = message.into();
        self.warnings
            .entry(mode)
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    pub fn itineraries_for(&self, mode: Mode) -> impl Iterator<Item = &SegmentedItinerary> {
        self.itineraries.iter().filter(move |i| i.mode() == mode)
    }

    /// Whether results for `mode` are present, degraded or absent.
    pub fn status(&self, mode: Mode) -> ModeStatus {
        let present = self.itineraries_for(mode).next().is_some();
        match (present, self.warnings.contains_key(&mode)) {
            (false, _) => ModeStatus::Absent,
            (true, true) => ModeStatus::Degraded,
            (true, false) => ModeStatus::Present,
        }
    }

    /// Status of every requested mode.
    pub fn statuses(&self) -> BTreeMap<Mode, ModeStatus> {
        self.requested.iter().map(|&m| (m, self.status(m))).collect()
    }
}
