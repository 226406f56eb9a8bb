//! Data transfer objects for web requests and responses.
//!
//! Field names are the ones existing frontends read, so they follow the
//! wire format rather than the domain names (`duration_min`,
//! `est_cost_chf`, `segment_id`, ...).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Alternative, AlternativeRef, Badge, Coordinate, InvalidCoordinate, Leg, LegMode, Mode,
    ModeDetails, ModeStatus, RouteResult, Segment, SegmentedItinerary, StationMatch,
    TransferPoint, TripRequest, UnknownMode, VehicleMatch,
};

/// Modes in the order clients list them.
pub const ADVERTISED_MODES: [Mode; 3] = [Mode::Transit, Mode::ScooterShare, Mode::BikeShare];

/// A WGS84 position as sent by clients.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl TryFrom<LatLon> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(p: LatLon) -> Result<Self, Self::Error> {
        Coordinate::new(p.lat, p.lon)
    }
}

/// Request to plan routes.
#[derive(Debug, Deserialize)]
pub struct PlanRoutesRequest {
    pub from: LatLon,
    pub to: LatLon,

    /// Selected modes. An explicit empty list is rejected by the planner.
    pub modes: Option<Vec<String>>,

    /// Single mode sent by older clients; ignored when `modes` is present.
    pub mode: Option<String>,

    /// Shared modes offered at transfer points; the selected ones when absent.
    pub alternative_modes: Option<Vec<String>>,
}

/// Why a request body could not become a trip request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    #[error(transparent)]
    Mode(#[from] UnknownMode),
}

impl PlanRoutesRequest {
    /// Selected mode names; public transport when none were sent.
    fn mode_names(&self) -> Vec<&str> {
        match (&self.modes, &self.mode) {
            (Some(modes), _) => modes.iter().map(String::as_str).collect(),
            (None, Some(mode)) => vec![mode.as_str()],
            (None, None) => vec![Mode::Transit.as_str()],
        }
    }

    pub fn to_trip_request(&self) -> Result<TripRequest, RequestError> {
        let origin = Coordinate::try_from(self.from)?;
        let destination = Coordinate::try_from(self.to)?;
        let modes = self
            .mode_names()
            .into_iter()
            .map(str::parse::<Mode>)
            .collect::<Result<Vec<_>, _>>()?;

        let request = TripRequest::new(origin, destination, modes);
        match &self.alternative_modes {
            Some(names) => {
                let alternatives = names
                    .iter()
                    .map(|name| name.parse::<Mode>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(request.with_alternative_modes(alternatives))
            }
            None => Ok(request),
        }
    }
}

/// Default search radius of the nearby-scooter lookup, in meters.
pub const DEFAULT_NEARBY_RADIUS_M: u32 = 300;

/// Query string of `GET /api/escooters/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyScootersQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
}

impl NearbyScootersQuery {
    pub fn radius_m(&self) -> u32 {
        self.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_M)
    }
}

/// Scooters around a point.
#[derive(Debug, Serialize)]
pub struct NearbyScootersResponse {
    pub scooters: Vec<ScooterView>,
    pub count: usize,
    pub query: NearbyQueryView,
}

/// The lookup as understood by the server.
#[derive(Debug, Serialize)]
pub struct NearbyQueryView {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: u32,
}

impl NearbyScootersResponse {
    pub fn new(found: &[VehicleMatch], query: &NearbyScootersQuery) -> Self {
        Self {
            scooters: found.iter().map(ScooterView::from_match).collect(),
            count: found.len(),
            query: NearbyQueryView {
                lat: query.lat,
                lon: query.lon,
                radius_m: query.radius_m(),
            },
        }
    }
}

/// Response listing the supported modes.
#[derive(Debug, Serialize)]
pub struct ModesResponse {
    pub modes: Vec<Mode>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct PlanRoutesResponse {
    pub routes: Vec<RouteView>,

    /// Per-mode explanation of missing or degraded results
    pub warnings: BTreeMap<Mode, String>,

    pub mode_status: BTreeMap<Mode, ModeStatus>,
}

impl PlanRoutesResponse {
    pub fn from_result(result: &RouteResult) -> Self {
        let mut counters: BTreeMap<Mode, usize> = BTreeMap::new();
        let routes = result
            .itineraries
            .iter()
            .map(|it| {
                let n = counters.entry(it.mode()).or_default();
                *n += 1;
                RouteView::from_itinerary(it, *n)
            })
            .collect();

        Self {
            routes,
            warnings: result.warnings.clone(),
            mode_status: result.statuses(),
        }
    }
}

/// One route option.
#[derive(Debug, Serialize)]
pub struct RouteView {
    /// "pt-1", "bike-2", "escoot-1"
    pub id: String,
    pub mode: Mode,
    pub summary: String,
    pub duration_min: Option<f64>,
    pub est_cost_chf: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    pub legs: Vec<LegView>,
    pub segmented: SegmentedView,
    pub has_alternatives: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_station: Option<StationView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_station: Option<StationView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scooter: Option<ScooterView>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nearby_scooters: Vec<ScooterView>,
}

fn id_prefix(mode: Mode) -> &'static str {
    match mode {
        Mode::Transit => "pt",
        Mode::BikeShare => "bike",
        Mode::ScooterShare => "escoot",
    }
}

impl RouteView {
    /// Build the view of the `n`th itinerary (1-based) of its mode.
    pub fn from_itinerary(it: &SegmentedItinerary, n: usize) -> Self {
        let candidate = &it.itinerary;

        let (start_station, dest_station, scooter, nearby_scooters) = match &candidate.details {
            ModeDetails::Transit { .. } => (None, None, None, Vec::new()),
            ModeDetails::BikeShare {
                start_station,
                dest_station,
            } => (
                Some(StationView::from_match(start_station)),
                dest_station.as_ref().map(StationView::from_match),
                None,
                Vec::new(),
            ),
            ModeDetails::ScooterShare { scooter, nearby } => (
                None,
                None,
                Some(ScooterView::from_match(scooter)),
                nearby.iter().map(ScooterView::from_match).collect(),
            ),
        };

        Self {
            id: format!("{}-{}", id_prefix(candidate.mode), n),
            mode: candidate.mode,
            summary: candidate.summary.clone(),
            duration_min: candidate.duration_minutes,
            est_cost_chf: candidate.cost_chf,
            warning: candidate.warning.clone(),
            legs: candidate.legs.iter().map(LegView::from_leg).collect(),
            segmented: SegmentedView::from_itinerary(it),
            has_alternatives: it.has_alternatives(),
            start_station,
            dest_station,
            scooter,
            nearby_scooters,
        }
    }
}

/// One raw leg.
#[derive(Debug, Serialize)]
pub struct LegView {
    pub mode: LegMode,
    pub from: String,
    pub to: String,
    pub duration_min: Option<f64>,
    pub distance_m: f64,
    pub route_short_name: Option<String>,
    pub headsign: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl LegView {
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            mode: leg.mode,
            from: leg.from_name.clone(),
            to: leg.to_name.clone(),
            duration_min: leg.duration_minutes,
            distance_m: leg.distance_meters.round(),
            route_short_name: leg.line_name.clone(),
            headsign: leg.headsign.clone(),
            start_time: leg.departs_at,
            end_time: leg.arrives_at,
        }
    }
}

/// Segmentation of a route.
#[derive(Debug, Serialize)]
pub struct SegmentedView {
    pub segments: Vec<SegmentView>,
    pub transfer_points: Vec<TransferPointView>,
    pub total_segments: usize,
    /// Transfer points excluding origin and destination
    pub total_transfers: usize,
}

impl SegmentedView {
    pub fn from_itinerary(it: &SegmentedItinerary) -> Self {
        Self {
            segments: it.segments.iter().map(SegmentView::from_segment).collect(),
            transfer_points: it
                .transfer_points
                .iter()
                .map(TransferPointView::from_point)
                .collect(),
            total_segments: it.segments.len(),
            total_transfers: it.transfer_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferPointView {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub is_station: bool,
}

impl TransferPointView {
    pub fn from_point(p: &TransferPoint) -> Self {
        Self {
            name: p.name.clone(),
            latitude: p.location.latitude(),
            longitude: p.location.longitude(),
            arrival_time: p.arrival,
            departure_time: p.departure,
            is_station: p.is_station_backed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SegmentView {
    pub segment_id: String,
    pub from: String,
    pub to: String,
    pub mode: LegMode,
    pub duration_min: f64,
    pub distance_m: f64,
    /// Line name of the segment's ride, if any
    pub route_info: Option<String>,
    pub alternatives_available: bool,
    pub alternatives: Vec<AlternativeView>,
}

impl SegmentView {
    pub fn from_segment(s: &Segment) -> Self {
        Self {
            segment_id: s.id.clone(),
            from: s.from.name.clone(),
            to: s.to.name.clone(),
            mode: s.mode,
            duration_min: s.duration_minutes,
            distance_m: s.distance_meters.round(),
            route_info: s.line_name.clone(),
            alternatives_available: !s.alternatives.is_empty(),
            alternatives: s
                .alternatives
                .iter()
                .map(AlternativeView::from_alternative)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlternativeView {
    pub mode: Mode,
    /// Service category: `bike_share` or `scooter_share`
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub summary: String,
    pub duration_min: f64,
    pub distance_km: Option<f64>,
    pub est_cost_chf: Option<f64>,
    pub rank_score: f64,
    pub badges: Vec<Badge>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_station: Option<StationView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_station: Option<StationView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scooter: Option<ScooterView>,
}

impl AlternativeView {
    pub fn from_alternative(a: &Alternative) -> Self {
        let (start_station, dest_station, scooter) = match &a.reference {
            Some(AlternativeRef::Station { start, dest }) => (
                Some(StationView::from_match(start)),
                dest.as_ref().map(StationView::from_match),
                None,
            ),
            Some(AlternativeRef::Vehicle(v)) => (None, None, Some(ScooterView::from_match(v))),
            None => (None, None, None),
        };

        Self {
            mode: a.mode,
            kind: a.mode.kind(),
            summary: a.summary.clone(),
            duration_min: a.duration_minutes,
            distance_km: a.distance_km,
            est_cost_chf: a.cost_chf,
            rank_score: a.rank_score,
            badges: a.badges.clone(),
            start_station,
            dest_station,
            scooter,
        }
    }
}

/// A bike-share station and how far it is from where it was searched.
#[derive(Debug, Serialize)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub distance_m: u32,
    pub address: Option<String>,
    pub bikes_available: u32,
    pub ebikes_available: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl StationView {
    pub fn from_match(m: &StationMatch) -> Self {
        Self {
            id: m.station.id.clone(),
            name: m.station.name.clone(),
            distance_m: whole_meters(m.distance_m),
            address: m.station.address.clone(),
            bikes_available: m.station.bikes_available,
            ebikes_available: m.station.ebikes_available,
            latitude: m.station.location.latitude(),
            longitude: m.station.location.longitude(),
        }
    }
}

/// A scooter and how far it is from where it was searched.
#[derive(Debug, Serialize)]
pub struct ScooterView {
    pub id: String,
    pub distance_m: u32,
    pub battery_percentage: Option<f64>,
    pub provider: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ScooterView {
    pub fn from_match(m: &VehicleMatch) -> Self {
        Self {
            id: m.vehicle.id.clone(),
            distance_m: whole_meters(m.distance_m),
            battery_percentage: m.vehicle.battery_percent,
            provider: m.vehicle.provider.clone(),
            latitude: m.vehicle.location.latitude(),
            longitude: m.vehicle.location.longitude(),
        }
    }
}

/// Truncate to whole meters, as the summaries do.
fn whole_meters(m: f64) -> u32 {
    m.max(0.0).trunc() as u32
}
