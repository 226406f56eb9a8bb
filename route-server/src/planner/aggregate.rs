//! Concurrent fan-out to the mode sources.
//!
//! One call per enabled mode, each with its own timeout, all awaited
//! together. A failed or slow source only costs its own mode: the other
//! modes still come back and the failure becomes a warning.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    CandidateItinerary, Mode, RouteResult, StationSnapshot, TripRequest, VehicleSnapshot,
};
use crate::sources::{
    AdapterError, SearchArea, StationFeed, TransitPlan, TransitPlanner, VehicleFeed,
};

use super::PlannerConfig;
use super::proximity::ProximityIndex;
use super::shared_trips::{bike_itineraries, scooter_itinerary};

/// Raw answers of one fan-out. `None` means the mode was not requested;
/// `Some(Err(_))` carries the warning for a failed call.
#[derive(Debug, Default)]
pub(crate) struct Fetched {
    pub transit: Option<Result<TransitPlan, String>>,
    pub stations: Option<Result<Vec<StationSnapshot>, String>>,
    pub vehicles: Option<Result<Vec<VehicleSnapshot>, String>>,
}

/// Query every needed source concurrently.
///
/// Shared-mode snapshots are also fetched when the mode is only offered
/// as an alternative. Futures for unneeded sources are never created, so
/// those sources see no call at all.
pub(crate) async fn fetch<T, S, V>(
    transit: &T,
    stations: &S,
    vehicles: &V,
    request: &TripRequest,
    area: &SearchArea,
    limit: Duration,
) -> Fetched
where
    T: TransitPlanner,
    S: StationFeed,
    V: VehicleFeed,
{
    let transit_call = async {
        if !request.is_enabled(Mode::Transit) {
            return None;
        }
        let call = transit.plan_transit(request.origin, request.destination);
        Some(bounded(Mode::Transit, limit, call).await)
    };
    let station_call = async {
        if !request.needs_snapshot(Mode::BikeShare) {
            return None;
        }
        Some(bounded(Mode::BikeShare, limit, stations.list_stations(area)).await)
    };
    let vehicle_call = async {
        if !request.needs_snapshot(Mode::ScooterShare) {
            return None;
        }
        Some(bounded(Mode::ScooterShare, limit, vehicles.list_vehicles(area)).await)
    };

    let (transit, stations, vehicles) = tokio::join!(transit_call, station_call, vehicle_call);
    Fetched {
        transit,
        stations,
        vehicles,
    }
}

/// Await `call` for at most `limit`, turning failure into a warning.
pub(crate) async fn bounded<R>(
    mode: Mode,
    limit: Duration,
    call: impl Future<Output = Result<R, AdapterError>>,
) -> Result<R, String> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(mode = %mode, error = %e, "Source call failed");
            Err(format!("{} unavailable: {e}", service_name(mode)))
        }
        Err(_) => {
            warn!(mode = %mode, timeout_secs = limit.as_secs_f64(), "Source call timed out");
            Err(format!(
                "{} did not respond within {}s",
                service_name(mode),
                limit.as_secs()
            ))
        }
    }
}

fn service_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Transit => "Public transport planner",
        Mode::BikeShare => "PubliBike",
        Mode::ScooterShare => "Voi scooter feed",
    }
}

impl Fetched {
    /// Turn the raw answers into candidate itineraries and the proximity
    /// index the alternatives are drawn from. Every mode that was asked
    /// but ends up with no itinerary leaves a warning in `result`.
    pub(crate) fn into_candidates(
        self,
        request: &TripRequest,
        config: &PlannerConfig,
        result: &mut RouteResult,
    ) -> (Vec<CandidateItinerary>, ProximityIndex) {
        let mut candidates = Vec::new();

        match self.transit {
            Some(Ok(plan)) => {
                // Unreadable upstream itineraries are dropped like malformed ones
                for reason in &plan.rejected {
                    result.warn(Mode::Transit, format!("Dropped malformed itinerary: {reason}"));
                }
                let total = plan.itineraries.len();
                let kept: Vec<_> = plan
                    .itineraries
                    .into_iter()
                    .filter(|it| !it.is_walk_only())
                    .take(config.max_transit_itineraries)
                    .collect();
                debug!(total, kept = kept.len(), "Transit itineraries received");
                if kept.is_empty() {
                    result.warn(Mode::Transit, "No public transport routes found");
                }
                candidates.extend(kept);
            }
            Some(Err(warning)) => result.warn(Mode::Transit, warning),
            None => {}
        }

        let stations = take_snapshot(self.stations, Mode::BikeShare, result);
        let vehicles = take_snapshot(self.vehicles, Mode::ScooterShare, result);
        let (have_stations, have_vehicles) = (stations.is_some(), vehicles.is_some());
        let index = ProximityIndex::new(stations.unwrap_or_default(), vehicles.unwrap_or_default());
        debug!(
            stations = index.station_count(),
            vehicles = index.vehicle_count(),
            "Proximity index built"
        );

        // A failed source already has its warning
        if have_stations && request.is_enabled(Mode::BikeShare) {
            match bike_itineraries(request, &index, config) {
                Ok(itineraries) => candidates.extend(itineraries),
                Err(warning) => result.warn(Mode::BikeShare, warning),
            }
        }
        if have_vehicles && request.is_enabled(Mode::ScooterShare) {
            match scooter_itinerary(request, &index, config) {
                Ok(itinerary) => candidates.push(itinerary),
                Err(warning) => result.warn(Mode::ScooterShare, warning),
            }
        }

        (candidates, index)
    }
}

fn take_snapshot<T>(
    fetched: Option<Result<Vec<T>, String>>,
    mode: Mode,
    result: &mut RouteResult,
) -> Option<Vec<T>> {
    match fetched? {
        Ok(items) => Some(items),
        Err(warning) => {
            result.warn(mode, warning);
            None
        }
    }
}
