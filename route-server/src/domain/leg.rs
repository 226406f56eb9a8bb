//! Itinerary leg types.
//!
//! A `Leg` is one atomic movement step as reported by a source adapter:
//! a walk to a stop, a bus ride, a bike ride between two stations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Fine-grained mode of a single leg.
///
/// Names follow the OpenTripPlanner vocabulary. Anything the planner
/// does not know about deserializes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegMode {
    Walk,
    Bus,
    Tram,
    Rail,
    Subway,
    Ferry,
    Funicular,
    Gondola,
    CableCar,
    Bicycle,
    Scooter,
    Car,
    #[serde(other)]
    Other,
}

impl LegMode {
    /// Parse an OTP mode string, mapping unknown values to `Other`.
    pub fn from_otp(s: &str) -> Self {
        match s {
            "WALK" => LegMode::Walk,
            "BUS" | "TROLLEYBUS" | "COACH" => LegMode::Bus,
            "TRAM" => LegMode::Tram,
            "RAIL" => LegMode::Rail,
            "SUBWAY" => LegMode::Subway,
            "FERRY" => LegMode::Ferry,
            "FUNICULAR" => LegMode::Funicular,
            "GONDOLA" => LegMode::Gondola,
            "CABLE_CAR" => LegMode::CableCar,
            "BICYCLE" => LegMode::Bicycle,
            "SCOOTER" => LegMode::Scooter,
            "CAR" => LegMode::Car,
            _ => LegMode::Other,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, LegMode::Walk)
    }

    /// True for scheduled public-transport vehicles.
    pub fn is_transit(&self) -> bool {
        matches!(
            self,
            LegMode::Bus
                | LegMode::Tram
                | LegMode::Rail
                | LegMode::Subway
                | LegMode::Ferry
                | LegMode::Funicular
                | LegMode::Gondola
                | LegMode::CableCar
                | LegMode::Other
        )
    }

    /// Human-readable label used in itinerary summaries.
    pub fn label(&self) -> &'static str {
        match self {
            LegMode::Walk => "Walk",
            LegMode::Bus => "Bus",
            LegMode::Tram => "Tram",
            LegMode::Rail => "Rail",
            LegMode::Subway => "Subway",
            LegMode::Ferry => "Ferry",
            LegMode::Funicular => "Funicular",
            LegMode::Gondola => "Gondola",
            LegMode::CableCar => "Cable car",
            LegMode::Bicycle => "Bike",
            LegMode::Scooter => "Scooter",
            LegMode::Car => "Car",
            LegMode::Other => "Transit",
        }
    }
}

/// What kind of place a leg starts or ends at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    /// An arbitrary street-level location (address, origin, destination).
    Street,
    /// A public-transport stop or platform.
    TransitStop,
    /// A bike-share docking station.
    BikeStation,
    /// The position of a free-floating vehicle.
    Vehicle,
}

impl PlaceKind {
    /// Stops and docking stations are the only points worth switching mode at.
    pub fn is_station(&self) -> bool {
        matches!(self, PlaceKind::TransitStop | PlaceKind::BikeStation)
    }
}

/// One movement step of a raw itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from_name: String,
    pub to_name: String,
    pub from: Coordinate,
    pub to: Coordinate,
    pub from_kind: PlaceKind,
    pub to_kind: PlaceKind,
    pub mode: LegMode,
    /// Travelled distance in meters, as reported by the source.
    pub distance_meters: f64,
    /// Duration in minutes; `None` when the source did not provide one.
    pub duration_minutes: Option<f64>,
    /// Route short name ("10", "S1") for transit legs.
    pub line_name: Option<String>,
    pub headsign: Option<String>,
    pub departs_at: Option<DateTime<Utc>>,
    pub arrives_at: Option<DateTime<Utc>>,
}

impl Leg {
    /// Create a street-to-street leg with no timing information.
    ///
    /// Callers fill in the remaining fields as needed.
    pub fn new(
        mode: LegMode,
        from_name: impl Into<String>,
        from: Coordinate,
        to_name: impl Into<String>,
        to: Coordinate,
    ) -> Self {
        Self {
            from_name: from_name.into(),
            to_name: to_name.into(),
            from,
            to,
            from_kind: PlaceKind::Street,
            to_kind: PlaceKind::Street,
            mode,
            distance_meters: from.distance_m(&to),
            duration_minutes: None,
            line_name: None,
            headsign: None,
            departs_at: None,
            arrives_at: None,
        }
    }

    /// Set the kinds of both endpoints.
    pub fn with_kinds(mut self, from_kind: PlaceKind, to_kind: PlaceKind) -> Self {
        self.from_kind = from_kind;
        self.to_kind = to_kind;
        self
    }

    /// Set the reported duration in minutes.
    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set the line name.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line_name = Some(line.into());
        self
    }

    /// Straight-line distance between the leg's endpoints in meters.
    pub fn straight_line_m(&self) -> f64 {
        self.from.distance_m(&self.to)
    }
}
