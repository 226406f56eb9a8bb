//! Nearest-neighbour lookup over station and vehicle snapshots.
//!
//! A city holds a few hundred stations and vehicles at most, so a linear
//! scan per query is fast enough and needs no spatial structure. The index
//! is built once per request and only read afterwards.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{
    Coordinate, Mode, StationMatch, StationSnapshot, VehicleMatch, VehicleSnapshot,
};

/// A station or vehicle near a query point.
#[derive(Debug, Clone, PartialEq)]
pub enum Nearby {
    Station(StationMatch),
    Vehicle(VehicleMatch),
}

impl Nearby {
    pub fn distance_m(&self) -> f64 {
        match self {
            Nearby::Station(m) => m.distance_m,
            Nearby::Vehicle(m) => m.distance_m,
        }
    }
}

/// Stations and vehicles of one planning request.
#[derive(Debug, Clone, Default)]
pub struct ProximityIndex {
    stations: Vec<StationSnapshot>,
    vehicles: Vec<VehicleSnapshot>,
}

impl ProximityIndex {
    /// Build an index. Entities with an id already seen are dropped; two
    /// stations may share a name, but never an id.
    pub fn new(
        stations: impl IntoIterator<Item = StationSnapshot>,
        vehicles: impl IntoIterator<Item = VehicleSnapshot>,
    ) -> Self {
        let mut seen = HashSet::new();
        let stations = stations
            .into_iter()
            .filter(|s| seen.insert(s.id.clone()))
            .collect();

        let mut seen = HashSet::new();
        let vehicles = vehicles
            .into_iter()
            .filter(|v| seen.insert(v.id.clone()))
            .collect();

        Self { stations, vehicles }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Up to `k` stations within `max_radius_m` of `point`, nearest first.
    pub fn nearest_stations(
        &self,
        point: Coordinate,
        k: usize,
        max_radius_m: f64,
    ) -> Vec<StationMatch> {
        nearest_by(&self.stations, point, k, max_radius_m, |s| (s.location, &s.id))
            .into_iter()
            .map(|(station, distance_m)| StationMatch {
                station: station.clone(),
                distance_m,
            })
            .collect()
    }

    /// Up to `k` vehicles within `max_radius_m` of `point`, nearest first.
    pub fn nearest_vehicles(
        &self,
        point: Coordinate,
        k: usize,
        max_radius_m: f64,
    ) -> Vec<VehicleMatch> {
        nearest_by(&self.vehicles, point, k, max_radius_m, |v| (v.location, &v.id))
            .into_iter()
            .map(|(vehicle, distance_m)| VehicleMatch {
                vehicle: vehicle.clone(),
                distance_m,
            })
            .collect()
    }

    /// Nearest entities serving `mode`. Transit has no inventory here.
    pub fn nearest(&self, point: Coordinate, mode: Mode, k: usize, max_radius_m: f64) -> Vec<Nearby> {
        match mode {
            Mode::BikeShare => self
                .nearest_stations(point, k, max_radius_m)
                .into_iter()
                .map(Nearby::Station)
                .collect(),
            Mode::ScooterShare => self
                .nearest_vehicles(point, k, max_radius_m)
                .into_iter()
                .map(Nearby::Vehicle)
                .collect(),
            Mode::Transit => Vec::new(),
        }
    }
}

/// Linear scan: distance to every item, filter by radius, sort by
/// `(distance, id)` and keep the first `k`.
fn nearest_by<'a, T>(
    items: &'a [T],
    point: Coordinate,
    k: usize,
    max_radius_m: f64,
    key: impl Fn(&'a T) -> (Coordinate, &'a String),
) -> Vec<(&'a T, f64)> {
    let mut found: Vec<(&T, &String, f64)> = items
        .iter()
        .filter_map(|item| {
            let (location, id) = key(item);
            let distance = point.distance_m(&location);
            (distance <= max_radius_m).then_some((item, id, distance))
        })
        .collect();

    found.sort_by(|a, b| {
        a.2.partial_cmp(&b.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });
    found.truncate(k);

    found.into_iter().map(|(item, _, d)| (item, d)).collect()
}
