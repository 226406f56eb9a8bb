//! Fixture-backed sources for development without upstream access.
//!
//! Loads recorded upstream responses from a directory and serves them as if
//! they were live API responses, through the same conversion code the live
//! clients use. Expected files:
//!
//! - `otp_plan.json`: an OTP plan response
//! - `publibike_stations.json`: PubliBike station details (with `vehicles`)
//! - `sharedmobility_identify.json`: a sharedmobility.ch identify response

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::{Coordinate, StationSnapshot, VehicleSnapshot};

use super::otp::{PlanResponse, convert_plan};
use super::publibike::StationDto;
use super::sharedmobility::{IdentifyResponse, VOI_PROVIDER_ID};
use super::{AdapterError, SearchArea, StationFeed, TransitPlan, TransitPlanner, VehicleFeed};

pub const OTP_FILE: &str = "otp_plan.json";
pub const STATIONS_FILE: &str = "publibike_stations.json";
pub const VEHICLES_FILE: &str = "sharedmobility_identify.json";

/// All three sources served from JSON files.
///
/// Data is converted once at load time; every call hands out clones, so
/// concurrent requests never share mutable state.
#[derive(Debug, Clone)]
pub struct FixtureSources {
    plan: Arc<TransitPlan>,
    stations: Arc<Vec<StationSnapshot>>,
    vehicles: Arc<Vec<VehicleSnapshot>>,
}

impl FixtureSources {
    /// Load fixtures from a directory.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let data_dir = data_dir.as_ref();

        let response: PlanResponse = read_json(&data_dir.join(OTP_FILE))?;
        let plan = convert_plan(&response);

        let station_dtos: Vec<StationDto> = read_json(&data_dir.join(STATIONS_FILE))?;
        let stations = station_dtos
            .iter()
            .filter(|s| s.is_active())
            .map(|s| {
                s.to_snapshot()
                    .map_err(|e| AdapterError::Fixture(format!("station {}: {}", s.id, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let identify: IdentifyResponse = read_json(&data_dir.join(VEHICLES_FILE))?;
        let vehicles = identify
            .into_features()
            .iter()
            .filter(|f| f.provider_id() == Some(VOI_PROVIDER_ID) && f.is_available())
            .map(|f| {
                f.to_snapshot("Voi")
                    .map_err(|e| AdapterError::Fixture(format!("vehicle: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            dir = %data_dir.display(),
            itineraries = plan.itineraries.len(),
            rejected = plan.rejected.len(),
            stations = stations.len(),
            vehicles = vehicles.len(),
            "Loaded fixture sources"
        );

        Ok(Self {
            plan: Arc::new(plan),
            stations: Arc::new(stations),
            vehicles: Arc::new(vehicles),
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AdapterError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| AdapterError::Fixture(format!("failed to read {:?}: {}", path, e)))?;

    serde_json::from_str(&json)
        .map_err(|e| AdapterError::Fixture(format!("failed to parse {:?}: {}", path, e)))
}

impl TransitPlanner for FixtureSources {
    /// Recorded itineraries are returned whatever the endpoints.
    async fn plan_transit(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
    ) -> Result<TransitPlan, AdapterError> {
        Ok(self.plan.as_ref().clone())
    }
}

impl StationFeed for FixtureSources {
    async fn list_stations(&self, area: &SearchArea) -> Result<Vec<StationSnapshot>, AdapterError> {
        Ok(self
            .stations
            .iter()
            .filter(|s| area.contains(&s.location))
            .cloned()
            .collect())
    }
}

impl VehicleFeed for FixtureSources {
    async fn list_vehicles(&self, area: &SearchArea) -> Result<Vec<VehicleSnapshot>, AdapterError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| area.contains(&v.location))
            .cloned()
            .collect())
    }
}
