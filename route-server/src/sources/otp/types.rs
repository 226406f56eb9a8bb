//! OpenTripPlanner REST API response types.
//!
//! These mirror the JSON returned by `/routers/{id}/plan` and are
//! converted to domain types in `convert`. Nearly everything is optional:
//! OTP omits fields freely depending on version and leg type.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level response of the plan endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    pub plan: Option<Plan>,
    /// Present instead of (or alongside an empty) `plan` when routing failed.
    pub error: Option<PlanErrorDto>,
}

/// Routing error object, e.g. `{"id": 404, "msg": "No trip found..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanErrorDto {
    pub id: Option<i64>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

impl PlanErrorDto {
    pub fn text(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown routing error".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub itineraries: Vec<ItineraryDto>,
}

/// A single itinerary. Durations are in seconds, times in epoch millis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDto {
    pub duration: Option<f64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub walk_distance: Option<f64>,
    pub transfers: Option<u32>,
    #[serde(default)]
    pub legs: Vec<LegDto>,
    pub fare: Option<FareDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub mode: String,
    pub from: PlaceDto,
    pub to: PlaceDto,
    /// Meters.
    pub distance: Option<f64>,
    /// Seconds.
    pub duration: Option<f64>,
    pub route_short_name: Option<String>,
    pub route: Option<String>,
    pub headsign: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDto {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// `NORMAL`, `TRANSIT`, `BIKESHARE`, `BIKEPARK`.
    pub vertex_type: Option<String>,
    pub stop_id: Option<String>,
}

/// Fare block: `{"fare": {"regular": {"cents": 460, ...}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FareDto {
    #[serde(default)]
    pub fare: HashMap<String, MoneyDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoneyDto {
    pub cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_response() {
        let json = r#"{"error": {"id": 404, "msg": "No trip found.", "noPath": true}}"#;
        let resp: PlanResponse = serde_json::from_str(json).unwrap();
        assert!(resp.plan.is_none());
        let err = resp.error.unwrap();
        assert_eq!(err.id, Some(404));
        assert_eq!(err.text(), "No trip found.");
    }

    #[test]
    fn parse_minimal_leg() {
        let json = r#"{
            "mode": "WALK",
            "from": {"name": "Origin", "lat": 46.949, "lon": 7.439},
            "to": {"name": "Bern, Bahnhof", "lat": 46.948, "lon": 7.44,
                   "vertexType": "TRANSIT", "stopId": "1:8507000"},
            "distance": 120.5,
            "duration": 95
        }"#;
        let leg: LegDto = serde_json::from_str(json).unwrap();
        assert_eq!(leg.mode, "WALK");
        assert_eq!(leg.to.vertex_type.as_deref(), Some("TRANSIT"));
        assert_eq!(leg.duration, Some(95.0));
        assert!(leg.route_short_name.is_none());
    }

    #[test]
    fn parse_fare() {
        let json = r#"{"fare": {"regular": {"cents": 460, "currency": {"currencyCode": "CHF"}}}}"#;
        let fare: FareDto = serde_json::from_str(json).unwrap();
        assert_eq!(fare.fare["regular"].cents, 460);
    }
}
