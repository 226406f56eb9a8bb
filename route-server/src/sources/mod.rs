//! Mobility source adapters.
//!
//! Each source answers in its own JSON dialect. Adapters translate those
//! responses into the common domain shapes at this boundary, so nothing
//! downstream ever sees an upstream DTO:
//!
//! - [`otp`]: public-transport itineraries from OpenTripPlanner
//! - [`publibike`]: docked bike-share stations with live occupancy
//! - [`sharedmobility`]: free-floating Voi scooters via sharedmobility.ch
//! - [`fixture`]: the same three traits served from JSON files on disk

use std::future::Future;

use crate::domain::{CandidateItinerary, Coordinate, StationSnapshot, TripRequest, VehicleSnapshot};

mod error;
pub mod fixture;
pub mod otp;
pub mod publibike;
pub mod sharedmobility;

pub use error::AdapterError;
pub(crate) use error::read_body;

/// The region a snapshot is requested for.
///
/// Shared-mobility feeds are city-wide; asking only for the circle that
/// covers the trip keeps both the payload and the number of follow-up
/// requests small.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub center: Coordinate,
    pub radius_m: f64,
}

impl SearchArea {
    pub fn new(center: Coordinate, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Circle around the trip midpoint covering both endpoints plus `margin_m`.
    pub fn around_trip(request: &TripRequest, margin_m: f64) -> Self {
        let center = request.origin.midpoint(&request.destination);
        let half = request.crow_distance_m() / 2.0;
        Self::new(center, half + margin_m)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        self.center.distance_m(point) <= self.radius_m
    }
}

/// Answer of a transit planner.
#[derive(Debug, Clone, Default)]
pub struct TransitPlan {
    /// Converted itineraries, best first
    pub itineraries: Vec<CandidateItinerary>,
    /// Upstream itineraries that could not be converted, one reason each
    pub rejected: Vec<String>,
}

impl TransitPlan {
    pub fn new(itineraries: Vec<CandidateItinerary>) -> Self {
        Self {
            itineraries,
            rejected: Vec::new(),
        }
    }
}

/// Source of public-transport itineraries.
pub trait TransitPlanner: Send + Sync {
    /// Plan transit itineraries between two points, best first.
    fn plan_transit(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<TransitPlan, AdapterError>> + Send;
}

/// Source of bike-share station snapshots.
pub trait StationFeed: Send + Sync {
    /// Active stations inside `area`, with current occupancy.
    fn list_stations(
        &self,
        area: &SearchArea,
    ) -> impl Future<Output = Result<Vec<StationSnapshot>, AdapterError>> + Send;
}

/// Source of free-floating vehicle snapshots.
pub trait VehicleFeed: Send + Sync {
    /// Rentable vehicles inside `area`.
    fn list_vehicles(
        &self,
        area: &SearchArea,
    ) -> impl Future<Output = Result<Vec<VehicleSnapshot>, AdapterError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn area_covers_both_endpoints() {
        let origin = coord(46.9490, 7.4390);
        let destination = coord(46.9470, 7.4510);
        let request = TripRequest::new(origin, destination, [Mode::BikeShare]);

        let area = SearchArea::around_trip(&request, 0.0);
        // Arithmetic midpoint is not exactly equidistant; allow a meter of slack
        let slack = SearchArea::new(area.center, area.radius_m + 1.0);
        assert!(slack.contains(&origin));
        assert!(slack.contains(&destination));

        let far = coord(46.99, 7.50);
        assert!(!area.contains(&far));
    }

    #[test]
    fn margin_extends_radius() {
        let request = TripRequest::new(coord(46.95, 7.44), coord(46.95, 7.44), [Mode::Transit]);
        let area = SearchArea::around_trip(&request, 800.0);
        assert_eq!(area.radius_m, 800.0);
    }
}
