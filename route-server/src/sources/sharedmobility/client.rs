//! sharedmobility.ch HTTP client.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::VehicleSnapshot;
use crate::sources::{AdapterError, SearchArea, VehicleFeed, read_body};

use super::types::IdentifyResponse;

/// Default base URL for the sharedmobility.ch API.
const DEFAULT_BASE_URL: &str = "https://api.sharedmobility.ch/v1/sharedmobility";

/// Provider id of Voi in the sharedmobility.ch feed.
pub const VOI_PROVIDER_ID: &str = "voiscooters.com";

/// Display name used when a feature carries no provider name.
const VOI_PROVIDER_NAME: &str = "Voi";

/// Configuration for the sharedmobility.ch client.
#[derive(Debug, Clone)]
pub struct SharedMobilityConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Provider whose vehicles are returned
    pub provider_id: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SharedMobilityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            provider_id: VOI_PROVIDER_ID.to_string(),
            timeout_secs: 10,
        }
    }
}

impl SharedMobilityConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn filters(&self) -> String {
        format!(
            "ch.bfe.sharedmobility.provider_id={},ch.bfe.sharedmobility.vehicle_type=E-Scooter",
            self.provider_id
        )
    }
}

/// Client for free-floating scooters from sharedmobility.ch.
#[derive(Debug, Clone)]
pub struct SharedMobilityClient {
    http: reqwest::Client,
    config: SharedMobilityConfig,
}

impl SharedMobilityClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SharedMobilityConfig) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Rentable scooters of the configured provider inside `area`.
    pub async fn vehicles_in(&self, area: &SearchArea) -> Result<Vec<VehicleSnapshot>, AdapterError> {
        let url = format!("{}/identify", self.config.base_url);
        let center = area.center;

        let response = self
            .http
            .get(&url)
            .query(&[
                ("filters", self.config.filters()),
                (
                    "geometry",
                    format!("{},{}", center.longitude(), center.latitude()),
                ),
                ("tolerance", format!("{:.0}", area.radius_m.ceil())),
                ("offset", "0".to_string()),
                ("geometryFormat", "esrijson".to_string()),
            ])
            .send()
            .await?;

        let body = read_body(response).await?;

        let features = serde_json::from_str::<IdentifyResponse>(&body)
            .map_err(|e| AdapterError::json(e, &body))?
            .into_features();

        let total = features.len();
        let vehicles: Vec<VehicleSnapshot> = features
            .iter()
            .filter(|f| f.provider_id() == Some(self.config.provider_id.as_str()))
            .filter(|f| f.is_available())
            .filter_map(|f| match f.to_snapshot(VOI_PROVIDER_NAME) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(error = %e, "Skipping unparseable vehicle feature");
                    None
                }
            })
            .collect();

        debug!(total, available = vehicles.len(), "Fetched shared vehicles");
        Ok(vehicles)
    }
}

impl VehicleFeed for SharedMobilityClient {
    async fn list_vehicles(&self, area: &SearchArea) -> Result<Vec<VehicleSnapshot>, AdapterError> {
        self.vehicles_in(area).await
    }
}
