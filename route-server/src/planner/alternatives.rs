//! Alternatives at transfer points.
//!
//! At every station-backed transfer point the traveller could leave the
//! itinerary and finish the trip on a shared bike or scooter instead.
//! Each such option is estimated, scored and attached to the segment that
//! ends at the transfer point.

use crate::domain::{
    Alternative, AlternativeRef, Coordinate, Mode, SegmentedItinerary, StationMatch,
    TransferPoint, TripRequest, VehicleMatch,
};

use super::PlannerConfig;
use super::proximity::{Nearby, ProximityIndex};
use super::rank::{Estimator, rank_alternatives, round_minutes, travel_minutes};
use super::shared_trips::{battery_label, provider_label};

/// Builds alternatives for segmented itineraries of one request.
pub struct AlternativeGenerator<'a> {
    index: &'a ProximityIndex,
    config: &'a PlannerConfig,
    estimator: Estimator,
}

impl<'a> AlternativeGenerator<'a> {
    pub fn new(index: &'a ProximityIndex, config: &'a PlannerConfig) -> Self {
        Self {
            index,
            config,
            estimator: config.estimator(),
        }
    }

    /// Attach ranked alternatives to every eligible segment.
    ///
    /// A segment is eligible when it ends at a station-backed transfer
    /// point other than the destination. Only shared modes the request
    /// offers, and that differ from the itinerary's own mode, are used.
    pub fn attach(&self, itinerary: &mut SegmentedItinerary, request: &TripRequest) {
        let own_mode = itinerary.mode();
        let modes: Vec<Mode> = Mode::ALL
            .into_iter()
            .filter(|m| *m != own_mode && request.offers_alternative(*m))
            .collect();
        if modes.is_empty() {
            return;
        }

        let last = itinerary.transfer_points.len().saturating_sub(1);
        for segment in &mut itinerary.segments {
            if segment.to.index >= last || !segment.to.is_station_backed {
                continue;
            }

            let mut found: Vec<Alternative> = modes
                .iter()
                .filter_map(|mode| self.alternative(&segment.to, *mode, request.destination))
                .collect();
            rank_alternatives(&mut found, self.config.max_alternatives);
            segment.alternatives = found;
        }
    }

    /// The best alternative of `mode` from `point`, if any.
    ///
    /// Bikes start at the nearest station that has one; scooters are
    /// taken as found.
    fn alternative(
        &self,
        point: &TransferPoint,
        mode: Mode,
        destination: Coordinate,
    ) -> Option<Alternative> {
        self.index
            .nearest(
                point.location,
                mode,
                self.config.alternative_candidates,
                self.config.alternative_radius_m,
            )
            .into_iter()
            .find_map(|candidate| match candidate {
                Nearby::Station(start) if start.station.has_bikes() => {
                    Some(self.bike_alternative(start, destination))
                }
                Nearby::Station(_) => None,
                Nearby::Vehicle(scooter) => Some(self.scooter_alternative(scooter, destination)),
            })
    }

    fn bike_alternative(&self, start: StationMatch, destination: Coordinate) -> Alternative {
        let dest = self
            .index
            .nearest_stations(destination, 1, self.config.alternative_radius_m)
            .into_iter()
            .next()
            .filter(|d| d.station.id != start.station.id);

        let speeds = self.estimator.speeds;
        let ride_end = dest.as_ref().map_or(destination, |d| d.station.location);
        let ride_m = start.station.location.distance_m(&ride_end);
        let ride_min = travel_minutes(ride_m, speeds.cycle_kmh);
        let access_min = travel_minutes(start.distance_m, speeds.walk_kmh);
        let egress_min = dest
            .as_ref()
            .map_or(0.0, |d| travel_minutes(d.distance_m, speeds.walk_kmh));

        let summary = format!(
            "PubliBike from {} ({:.0}m)",
            start.station.name,
            start.distance_m.trunc()
        );

        self.finish(
            Mode::BikeShare,
            summary,
            access_min + ride_min + egress_min,
            ride_min,
            ride_m,
            AlternativeRef::Station { start, dest },
        )
    }

    fn scooter_alternative(&self, scooter: VehicleMatch, destination: Coordinate) -> Alternative {
        let speeds = self.estimator.speeds;
        let ride_m = scooter.vehicle.location.distance_m(&destination);
        let ride_min = travel_minutes(ride_m, speeds.scooter_kmh);
        let access_min = travel_minutes(scooter.distance_m, speeds.walk_kmh);

        let vehicle = &scooter.vehicle;
        let mut summary = format!(
            "{} Scooter ({:.0}m away, {})",
            provider_label(&vehicle.provider),
            scooter.distance_m.trunc(),
            battery_label(vehicle.battery_percent),
        );
        if vehicle
            .battery_percent
            .is_some_and(|b| b < self.config.low_battery_percent)
        {
            summary.push_str(", low battery");
        }

        self.finish(
            Mode::ScooterShare,
            summary,
            access_min + ride_min,
            ride_min,
            ride_m,
            AlternativeRef::Vehicle(scooter),
        )
    }

    fn finish(
        &self,
        mode: Mode,
        summary: String,
        total_min: f64,
        ride_min: f64,
        ride_m: f64,
        reference: AlternativeRef,
    ) -> Alternative {
        let duration_minutes = round_minutes(total_min);
        let cost_chf = Some(self.estimator.cost(mode, ride_min));

        Alternative {
            mode,
            summary,
            duration_minutes,
            cost_chf,
            distance_km: Some((ride_m / 100.0).round() / 10.0),
            reference: Some(reference),
            rank_score: self.config.weights.score(duration_minutes, cost_chf),
            badges: self.config.badges.badges(duration_minutes, cost_chf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CandidateItinerary, Leg, LegMode, ModeDetails, PlaceKind, StationSnapshot,
        VehicleSnapshot,
    };
    use crate::planner::Segmenter;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn origin() -> Coordinate {
        coord(46.9490, 7.4390)
    }

    fn destination() -> Coordinate {
        coord(46.9470, 7.4510)
    }

    fn stop_a() -> Coordinate {
        coord(46.9480, 7.4400)
    }

    fn stop_b() -> Coordinate {
        coord(46.9476, 7.4474)
    }

    fn station(id: &str, location: Coordinate, bikes: u32) -> StationSnapshot {
        StationSnapshot {
            id: id.to_string(),
            name: format!("Station {id}"),
            location,
            bikes_available: bikes,
            ebikes_available: 0,
            address: None,
        }
    }

    fn scooter(id: &str, location: Coordinate, battery: Option<f64>) -> VehicleSnapshot {
        VehicleSnapshot {
            id: id.to_string(),
            location,
            battery_percent: battery,
            provider: "Voi".to_string(),
        }
    }

    /// WALK → STOP_A, BUS 10 → STOP_B, WALK → destination
    fn bern_itinerary() -> SegmentedItinerary {
        let legs = vec![
            Leg::new(LegMode::Walk, "Origin", origin(), "Stop A", stop_a())
                .with_kinds(PlaceKind::Street, PlaceKind::TransitStop),
            Leg::new(LegMode::Bus, "Stop A", stop_a(), "Stop B", stop_b())
                .with_kinds(PlaceKind::TransitStop, PlaceKind::TransitStop)
                .with_line("10"),
            Leg::new(LegMode::Walk, "Stop B", stop_b(), "Destination", destination())
                .with_kinds(PlaceKind::TransitStop, PlaceKind::Street),
        ];
        let itinerary = CandidateItinerary {
            mode: Mode::Transit,
            legs,
            summary: String::new(),
            duration_minutes: None,
            cost_chf: None,
            warning: None,
            details: ModeDetails::Transit {
                transfers: 0,
                walk_distance_m: 0.0,
            },
        };
        Segmenter::new(Estimator::default(), 25.0)
            .segment(itinerary, origin(), destination())
            .unwrap()
    }

    fn request(modes: &[Mode]) -> TripRequest {
        TripRequest::new(origin(), destination(), modes.iter().copied())
    }

    #[test]
    fn transit_only_request_gets_no_alternatives() {
        let index = ProximityIndex::new(
            vec![station("s", stop_b(), 3)],
            vec![scooter("v", stop_b(), Some(80.0))],
        );
        let config = PlannerConfig::default();
        let mut it = bern_itinerary();

        AlternativeGenerator::new(&index, &config).attach(&mut it, &request(&[Mode::Transit]));
        assert!(!it.has_alternatives());
    }

    #[test]
    fn alternatives_only_at_intermediate_station_points() {
        let index = ProximityIndex::new(
            vec![
                station("near-b", coord(46.9478, 7.4476), 2),
                station("near-dest", coord(46.9471, 7.4508), 1),
            ],
            vec![scooter("v", coord(46.9475, 7.4472), Some(80.0))],
        );
        let config = PlannerConfig::default();
        let mut it = bern_itinerary();

        AlternativeGenerator::new(&index, &config).attach(
            &mut it,
            &request(&[Mode::Transit, Mode::BikeShare, Mode::ScooterShare]),
        );

        assert_eq!(it.segments.len(), 2);
        let at_b = &it.segments[0].alternatives;
        assert_eq!(at_b.len(), 2);
        assert!(it.segments[1].alternatives.is_empty());

        for pair in at_b.windows(2) {
            assert!(pair[0].rank_score <= pair[1].rank_score);
        }

        let bike = at_b.iter().find(|a| a.mode == Mode::BikeShare).unwrap();
        assert!(bike.summary.starts_with("PubliBike from Station near-b ("));
        match bike.reference.as_ref().unwrap() {
            AlternativeRef::Station { start, dest } => {
                assert_eq!(start.station.id, "near-b");
                assert_eq!(dest.as_ref().unwrap().station.id, "near-dest");
            }
            other => panic!("unexpected reference {other:?}"),
        }
        // Short hop: both cheap and fast
        assert!(bike.badges.contains(&crate::domain::Badge::Fast));
        assert!(bike.cost_chf.unwrap() >= 2.9);

        let scooter = at_b.iter().find(|a| a.mode == Mode::ScooterShare).unwrap();
        assert!(scooter.summary.starts_with("Voi Scooter ("));
        assert!(scooter.summary.ends_with("80% battery)"));
    }

    #[test]
    fn zero_bike_station_skipped() {
        let index = ProximityIndex::new(
            vec![
                station("empty", coord(46.9476, 7.4475), 0),
                station("full", coord(46.9480, 7.4480), 4),
            ],
            vec![],
        );
        let config = PlannerConfig::default();
        let mut it = bern_itinerary();

        AlternativeGenerator::new(&index, &config)
            .attach(&mut it, &request(&[Mode::Transit, Mode::BikeShare]));

        let alts = &it.segments[0].alternatives;
        assert_eq!(alts.len(), 1);
        match alts[0].reference.as_ref().unwrap() {
            AlternativeRef::Station { start, .. } => assert_eq!(start.station.id, "full"),
            other => panic!("unexpected reference {other:?}"),
        }
    }

    #[test]
    fn no_qualifying_station_means_no_bike_alternative() {
        let index = ProximityIndex::new(vec![station("empty", stop_b(), 0)], vec![]);
        let config = PlannerConfig::default();
        let mut it = bern_itinerary();

        AlternativeGenerator::new(&index, &config)
            .attach(&mut it, &request(&[Mode::Transit, Mode::BikeShare]));
        assert!(!it.has_alternatives());
    }

    #[test]
    fn scooter_battery_callouts() {
        let config = PlannerConfig::default();

        let low = ProximityIndex::new(vec![], vec![scooter("v", stop_b(), Some(12.0))]);
        let mut it = bern_itinerary();
        AlternativeGenerator::new(&low, &config)
            .attach(&mut it, &request(&[Mode::Transit, Mode::ScooterShare]));
        let summary = &it.segments[0].alternatives[0].summary;
        assert!(summary.contains("12% battery, low battery"), "{summary}");

        let unknown = ProximityIndex::new(vec![], vec![scooter("v", stop_b(), None)]);
        let mut it = bern_itinerary();
        AlternativeGenerator::new(&unknown, &config)
            .attach(&mut it, &request(&[Mode::Transit, Mode::ScooterShare]));
        let summary = &it.segments[0].alternatives[0].summary;
        assert!(summary.contains("battery unknown"), "{summary}");
    }

    #[test]
    fn scooter_duration_is_walk_plus_ride() {
        let config = PlannerConfig::default();
        let index = ProximityIndex::new(vec![], vec![scooter("v", stop_b(), Some(90.0))]);
        let mut it = bern_itinerary();
        AlternativeGenerator::new(&index, &config)
            .attach(&mut it, &request(&[Mode::Transit, Mode::ScooterShare]));

        let alt = &it.segments[0].alternatives[0];
        let ride_m = stop_b().distance_m(&destination());
        let expected = round_minutes(travel_minutes(ride_m, 18.0));
        assert!((alt.duration_minutes - expected).abs() <= 0.1);
        assert_eq!(
            alt.rank_score,
            alt.duration_minutes + 0.5 * alt.cost_chf.unwrap()
        );
    }

    #[test]
    fn capped_at_max_alternatives() {
        let index = ProximityIndex::new(
            vec![station("s", stop_b(), 3)],
            vec![scooter("v", stop_b(), Some(80.0))],
        );
        let config = PlannerConfig::default().with_max_alternatives(1);
        let mut it = bern_itinerary();

        AlternativeGenerator::new(&index, &config).attach(
            &mut it,
            &request(&[Mode::Transit, Mode::BikeShare, Mode::ScooterShare]),
        );
        assert_eq!(it.segments[0].alternatives.len(), 1);
    }
}
