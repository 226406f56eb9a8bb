//! OpenTripPlanner HTTP client.

use std::time::Duration;

use tracing::debug;

use crate::domain::Coordinate;
use crate::sources::{AdapterError, TransitPlan, TransitPlanner, read_body};

use super::convert::convert_plan;
use super::types::PlanResponse;

/// Default base URL for a locally running OTP instance.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/otp";

/// OTP's routing error id for "no trip found".
const PATH_NOT_FOUND: i64 = 404;

/// Configuration for the OTP client.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Base URL, up to and including `/otp`
    pub base_url: String,
    /// Router id in the URL path
    pub router_id: String,
    /// Number of itineraries to request
    pub num_itineraries: u8,
    /// Maximum walking distance in meters
    pub max_walk_distance_m: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            router_id: "default".to_string(),
            num_itineraries: 3,
            max_walk_distance_m: 1000,
            timeout_secs: 30,
        }
    }
}

impl OtpConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the router id.
    pub fn with_router_id(mut self, id: impl Into<String>) -> Self {
        self.router_id = id.into();
        self
    }

    /// Set the number of requested itineraries.
    pub fn with_num_itineraries(mut self, n: u8) -> Self {
        self.num_itineraries = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn plan_url(&self) -> String {
        format!(
            "{}/routers/{}/plan",
            self.base_url.trim_end_matches('/'),
            self.router_id
        )
    }
}

/// OpenTripPlanner REST client for transit itineraries.
#[derive(Debug, Clone)]
pub struct OtpClient {
    http: reqwest::Client,
    config: OtpConfig,
}

impl OtpClient {
    /// Create a new OTP client with the given configuration.
    pub fn new(config: OtpConfig) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Request a `TRANSIT,WALK` plan between two points.
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<TransitPlan, AdapterError> {
        let response = self
            .http
            .get(self.config.plan_url())
            .query(&[
                ("fromPlace", origin.to_string()),
                ("toPlace", destination.to_string()),
                ("mode", "TRANSIT,WALK".to_string()),
                ("numItineraries", self.config.num_itineraries.to_string()),
                ("maxWalkDistance", self.config.max_walk_distance_m.to_string()),
                ("arriveBy", "false".to_string()),
            ])
            .send()
            .await?;

        let body = read_body(response).await?;

        let plan: PlanResponse =
            serde_json::from_str(&body).map_err(|e| AdapterError::json(e, &body))?;

        if let Some(err) = &plan.error {
            // "No trip found" is an empty answer, not a failure
            if err.id == Some(PATH_NOT_FOUND) {
                debug!(message = %err.text(), "OTP found no trip");
                return Ok(TransitPlan::default());
            }
            return Err(AdapterError::Api {
                status: err.id.and_then(|id| u16::try_from(id).ok()).unwrap_or(0),
                message: err.text(),
            });
        }

        let converted = convert_plan(&plan);
        debug!(
            count = converted.itineraries.len(),
            rejected = converted.rejected.len(),
            "OTP plan converted"
        );
        Ok(converted)
    }
}

impl TransitPlanner for OtpClient {
    async fn plan_transit(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<TransitPlan, AdapterError> {
        self.plan(origin, destination).await
    }
}
