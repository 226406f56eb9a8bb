//! PubliBike public API response types.
//!
//! `/public/stations` returns an overview array; `/public/stations/{id}`
//! returns the same object with its `vehicles` filled in.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, InvalidCoordinate, StationSnapshot};

/// State id PubliBike uses for stations in service.
const STATE_ACTIVE: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub state: Option<StationStateDto>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub vehicles: Vec<VehicleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationStateDto {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleTypeDto>,
    /// Only e-bikes report a battery level.
    pub ebike_battery_level: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleTypeDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl StationDto {
    pub fn is_active(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.id == STATE_ACTIVE)
    }

    pub fn location(&self) -> Result<Coordinate, InvalidCoordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Convert to a snapshot. Occupancy is only meaningful on detail responses.
    pub fn to_snapshot(&self) -> Result<StationSnapshot, InvalidCoordinate> {
        let ebikes = self
            .vehicles
            .iter()
            .filter(|v| v.ebike_battery_level.is_some())
            .count();

        Ok(StationSnapshot {
            id: self.id.to_string(),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| format!("Station {}", self.id)),
            location: self.location()?,
            bikes_available: self.vehicles.len() as u32,
            ebikes_available: ebikes as u32,
            address: self.address.clone(),
        })
    }
}
