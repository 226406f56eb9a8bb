//! Live shared-mobility inventory.
//!
//! Snapshots are taken once per planning request and never updated in
//! place; two concurrent requests each hold their own.

use serde::Serialize;

use super::Coordinate;

/// A bike-share docking station and its current occupancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    pub bikes_available: u32,
    pub ebikes_available: u32,
    pub address: Option<String>,
}

impl StationSnapshot {
    pub fn has_bikes(&self) -> bool {
        self.bikes_available > 0
    }
}

/// A free-floating scooter and its reported charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub location: Coordinate,
    /// State of charge in percent; some feeds omit it.
    pub battery_percent: Option<f64>,
    pub provider: String,
}

/// A station found near some point, with its distance from that point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMatch {
    pub station: StationSnapshot,
    pub distance_m: f64,
}

/// A vehicle found near some point, with its distance from that point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMatch {
    pub vehicle: VehicleSnapshot,
    pub distance_m: f64,
}
