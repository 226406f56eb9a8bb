//! Bike-share and scooter-share itineraries.
//!
//! Shared-mobility feeds return inventory, not routes. This module turns a
//! snapshot into door-to-door itineraries of the same shape transit
//! itineraries have: walk to the bike or scooter, ride, walk the rest.

use crate::domain::{
    CandidateItinerary, Leg, LegMode, Mode, ModeDetails, PlaceKind, StationMatch, TripRequest,
};

use super::PlannerConfig;
use super::proximity::ProximityIndex;
use super::rank::{Estimator, round_minutes};

/// Bike-share itineraries from stations near the origin to the station
/// nearest the destination.
///
/// Returns the reason when no itinerary can be built.
pub fn bike_itineraries(
    request: &TripRequest,
    index: &ProximityIndex,
    config: &PlannerConfig,
) -> Result<Vec<CandidateItinerary>, String> {
    let radius = config.shared_access_radius_m;
    let starts: Vec<StationMatch> = index
        .nearest_stations(request.origin, usize::MAX, radius)
        .into_iter()
        .filter(|m| m.station.has_bikes())
        .collect();
    let dest = index
        .nearest_stations(request.destination, 1, radius)
        .into_iter()
        .next();

    let dest = match (starts.is_empty(), dest) {
        (false, Some(dest)) => dest,
        (true, None) => {
            return Err(format!(
                "No PubliBike stations within {radius:.0} m of start or destination"
            ));
        }
        (true, Some(_)) => {
            return Err(format!(
                "No PubliBike bikes available within {radius:.0} m of start"
            ));
        }
        (false, None) => {
            return Err(format!(
                "No PubliBike return station within {radius:.0} m of destination"
            ));
        }
    };

    let estimator = config.estimator();
    let itineraries: Vec<_> = starts
        .into_iter()
        .filter(|start| start.station.id != dest.station.id)
        .take(config.max_bike_itineraries)
        .map(|start| bike_itinerary(request, start, dest.clone(), &estimator))
        .collect();

    if itineraries.is_empty() {
        return Err("Start and destination share the same PubliBike station".to_string());
    }
    Ok(itineraries)
}

fn bike_itinerary(
    request: &TripRequest,
    start: StationMatch,
    dest: StationMatch,
    estimator: &Estimator,
) -> CandidateItinerary {
    let legs = vec![
        timed(
            Leg::new(
                LegMode::Walk,
                "Origin",
                request.origin,
                &start.station.name,
                start.station.location,
            )
            .with_kinds(PlaceKind::Street, PlaceKind::BikeStation),
            estimator,
        ),
        timed(
            Leg::new(
                LegMode::Bicycle,
                &start.station.name,
                start.station.location,
                &dest.station.name,
                dest.station.location,
            )
            .with_kinds(PlaceKind::BikeStation, PlaceKind::BikeStation),
            estimator,
        ),
        timed(
            Leg::new(
                LegMode::Walk,
                &dest.station.name,
                dest.station.location,
                "Destination",
                request.destination,
            )
            .with_kinds(PlaceKind::BikeStation, PlaceKind::Street),
            estimator,
        ),
    ];

    let bike = if start.station.ebikes_available > 0 {
        "E-Bike"
    } else {
        "Bike"
    };
    let summary = format!(
        "Walk {:.0}m to {} → {} {:.1}km → {} → Walk {:.0}m",
        start.distance_m.trunc(),
        start.station.name,
        bike,
        legs[1].distance_meters / 1000.0,
        dest.station.name,
        dest.distance_m.trunc(),
    );

    CandidateItinerary {
        mode: Mode::BikeShare,
        legs,
        summary,
        duration_minutes: None,
        cost_chf: None,
        warning: None,
        details: ModeDetails::BikeShare {
            start_station: start,
            dest_station: Some(dest),
        },
    }
}

/// A scooter itinerary using the vehicle nearest the origin.
///
/// Returns the reason when no vehicle is in range.
pub fn scooter_itinerary(
    request: &TripRequest,
    index: &ProximityIndex,
    config: &PlannerConfig,
) -> Result<CandidateItinerary, String> {
    let radius = config.shared_access_radius_m;
    let nearby = index.nearest_vehicles(request.origin, config.max_nearby_vehicles, radius);

    let Some(scooter) = nearby.first().cloned() else {
        return Err(format!(
            "No Voi scooters available within {radius:.0} m of start"
        ));
    };

    let estimator = config.estimator();
    let vehicle = &scooter.vehicle;
    let legs = vec![
        timed(
            Leg::new(
                LegMode::Walk,
                "Origin",
                request.origin,
                "Scooter",
                vehicle.location,
            )
            .with_kinds(PlaceKind::Street, PlaceKind::Vehicle),
            &estimator,
        ),
        timed(
            Leg::new(
                LegMode::Scooter,
                "Scooter",
                vehicle.location,
                "Destination",
                request.destination,
            )
            .with_kinds(PlaceKind::Vehicle, PlaceKind::Street),
            &estimator,
        ),
    ];

    let summary = format!(
        "Walk {:.0}m to {} scooter ({}) → Scooter {:.1}km to destination",
        scooter.distance_m.trunc(),
        provider_label(&vehicle.provider),
        battery_label(vehicle.battery_percent),
        legs[1].distance_meters / 1000.0,
    );

    let warning = vehicle
        .battery_percent
        .filter(|b| *b < config.low_battery_percent)
        .map(|b| format!("Scooter battery low ({b:.0}%)"));

    Ok(CandidateItinerary {
        mode: Mode::ScooterShare,
        legs,
        summary,
        duration_minutes: None,
        cost_chf: None,
        warning,
        details: ModeDetails::ScooterShare {
            scooter,
            nearby,
        },
    })
}

fn timed(leg: Leg, estimator: &Estimator) -> Leg {
    let minutes = round_minutes(estimator.leg_minutes(&leg));
    leg.with_duration(minutes)
}

/// "Voi Technology AB" → "Voi".
pub(crate) fn provider_label(provider: &str) -> &str {
    provider.split_whitespace().next().unwrap_or("Shared")
}

/// "76% battery", or "battery unknown" when the feed omitted it.
pub(crate) fn battery_label(battery: Option<f64>) -> String {
    match battery {
        Some(b) => format!("{b:.0}% battery"),
        None => "battery unknown".to_string(),
    }
}
