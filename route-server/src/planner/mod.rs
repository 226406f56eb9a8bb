//! Multimodal route planning.
//!
//! This module answers "how do I get from here to there?" by combining
//! public transport, bike-share and scooter-share:
//!
//! 1. the enabled sources are queried concurrently, each with a timeout
//! 2. shared-mobility snapshots are turned into door-to-door itineraries
//! 3. every itinerary is cut into segments at its transfer points
//! 4. station-backed transfer points get ranked shared-mode alternatives
//!
//! A failing source never fails the request; it only adds a warning.

mod aggregate;
mod alternatives;
mod config;
mod proximity;
mod rank;
mod segment;
mod shared_trips;

pub use alternatives::AlternativeGenerator;
pub use config::PlannerConfig;
pub use proximity::{Nearby, ProximityIndex};
pub use rank::{
    BadgeThresholds, Estimator, RankWeights, Speeds, Tariff, Tariffs, rank_alternatives,
    round_chf, round_minutes, travel_minutes,
};
pub use segment::{SegmentError, Segmenter};
pub use shared_trips::{bike_itineraries, scooter_itinerary};

use tracing::{debug, info, warn};

use crate::domain::{
    Coordinate, DomainError, Mode, RouteResult, StationSnapshot, TripRequest, VehicleMatch,
};
use crate::sources::{SearchArea, StationFeed, TransitPlanner, VehicleFeed};

/// Error from route planning.
///
/// Source failures are not errors; they end up as warnings in the result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The request was rejected before any source was contacted
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// The only source that could answer failed or timed out
    #[error("{0}")]
    SourceUnavailable(String),
}

/// Route planner over one source per mode.
pub struct RoutePlanner<T, S, V> {
    transit: T,
    stations: S,
    vehicles: V,
    config: PlannerConfig,
}

impl<T, S, V> RoutePlanner<T, S, V>
where
    T: TransitPlanner,
    S: StationFeed,
    V: VehicleFeed,
{
    /// Create a new planner.
    pub fn new(transit: T, stations: S, vehicles: V, config: PlannerConfig) -> Self {
        Self {
            transit,
            stations,
            vehicles,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan itineraries for every enabled mode.
    ///
    /// Returns `Ok` with an empty itinerary list, and a warning per mode,
    /// when every source fails.
    pub async fn plan_routes(&self, request: &TripRequest) -> Result<RouteResult, PlanError> {
        request.validate()?;

        info!(
            origin = %request.origin,
            destination = %request.destination,
            modes = ?request.enabled_modes,
            "Planning routes"
        );

        let mut result = RouteResult {
            requested: request.enabled_modes.clone(),
            ..RouteResult::default()
        };

        let area = SearchArea::around_trip(request, self.config.search_margin_m);
        let fetched = aggregate::fetch(
            &self.transit,
            &self.stations,
            &self.vehicles,
            request,
            &area,
            self.config.adapter_timeout,
        )
        .await;
        let (candidates, index) = fetched.into_candidates(request, &self.config, &mut result);

        let estimator = self.config.estimator();
        let segmenter = Segmenter::new(estimator, self.config.max_leg_gap_m);
        let generator = AlternativeGenerator::new(&index, &self.config);

        for mut candidate in candidates {
            let mode = candidate.mode;
            estimator.fill(&mut candidate);

            match segmenter.segment(candidate, request.origin, request.destination) {
                Ok(mut segmented) => {
                    generator.attach(&mut segmented, request);
                    result.itineraries.push(segmented);
                }
                Err(e) => {
                    warn!(mode = %mode, error = %e, "Dropping malformed itinerary");
                    result.warn(mode, format!("Dropped malformed itinerary: {e}"));
                }
            }
        }

        info!(
            itineraries = result.itineraries.len(),
            warnings = result.warnings.len(),
            "Planning finished"
        );

        Ok(result)
    }

    /// Scooters within `radius_m` of `point`, nearest first.
    ///
    /// A failing vehicle feed is an error here, not a warning.
    pub async fn nearby_vehicles(
        &self,
        point: Coordinate,
        radius_m: f64,
    ) -> Result<Vec<VehicleMatch>, PlanError> {
        let area = SearchArea::new(point, radius_m);
        let call = self.vehicles.list_vehicles(&area);
        let vehicles = aggregate::bounded(Mode::ScooterShare, self.config.adapter_timeout, call)
            .await
            .map_err(PlanError::SourceUnavailable)?;

        let index = ProximityIndex::new(Vec::<StationSnapshot>::new(), vehicles);
        let found = index.nearest_vehicles(point, index.vehicle_count(), radius_m);
        debug!(%point, radius_m, count = found.len(), "Nearby vehicles");
        Ok(found)
    }
}
