//! sharedmobility.ch identify endpoint response types.
//!
//! With `geometryFormat=esrijson` each feature carries its position as
//! `geometry: {x: lon, y: lat}`. Depending on the deployment the features
//! come either as a bare array or wrapped in `{"results": [...]}`.

use serde::Deserialize;

use crate::domain::{Coordinate, InvalidCoordinate, VehicleSnapshot};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdentifyResponse {
    Features(Vec<FeatureDto>),
    Wrapped {
        #[serde(default)]
        results: Vec<FeatureDto>,
    },
}

impl IdentifyResponse {
    pub fn into_features(self) -> Vec<FeatureDto> {
        match self {
            IdentifyResponse::Features(f) => f,
            IdentifyResponse::Wrapped { results } => results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureDto {
    /// Feature id; a string or a number depending on the provider.
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub attributes: AttributesDto,
    pub geometry: Option<GeometryDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributesDto {
    pub id: Option<String>,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    /// A string, or a list of strings.
    pub vehicle_type: Option<serde_json::Value>,
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub vehicle_status_reserved: bool,
    #[serde(default)]
    pub vehicle_status_disabled: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeometryDto {
    pub x: f64,
    pub y: f64,
}

/// Error converting a feature to a vehicle snapshot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeatureError {
    #[error("feature has no geometry")]
    NoGeometry,

    #[error("feature has no id")]
    NoId,

    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

impl FeatureDto {
    pub fn provider_id(&self) -> Option<&str> {
        self.attributes.provider_id.as_deref()
    }

    /// Neither reserved nor disabled.
    pub fn is_available(&self) -> bool {
        !self.attributes.vehicle_status_reserved && !self.attributes.vehicle_status_disabled
    }

    fn vehicle_id(&self) -> Option<String> {
        if let Some(id) = &self.attributes.id {
            return Some(id.clone());
        }
        match &self.id {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn to_snapshot(&self, default_provider: &str) -> Result<VehicleSnapshot, FeatureError> {
        let geometry = self.geometry.ok_or(FeatureError::NoGeometry)?;
        let id = self.vehicle_id().ok_or(FeatureError::NoId)?;

        Ok(VehicleSnapshot {
            id,
            location: Coordinate::new(geometry.y, geometry.x)?,
            battery_percent: self.attributes.battery_level,
            provider: self
                .attributes
                .provider_name
                .clone()
                .unwrap_or_else(|| default_provider.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE: &str = r#"{
        "id": "voi:abc123",
        "attributes": {
            "id": "voiscooters.com:abc123",
            "provider_id": "voiscooters.com",
            "provider_name": "Voi Technology AB",
            "vehicle_type": ["E-Scooter"],
            "battery_level": 76.0,
            "vehicle_status_reserved": false,
            "vehicle_status_disabled": false
        },
        "geometry": {"x": 7.4395, "y": 46.9488}
    }"#;

    #[test]
    fn feature_to_snapshot() {
        let feature: FeatureDto = serde_json::from_str(FEATURE).unwrap();
        assert!(feature.is_available());
        assert_eq!(feature.provider_id(), Some("voiscooters.com"));

        let v = feature.to_snapshot("Voi").unwrap();
        assert_eq!(v.id, "voiscooters.com:abc123");
        assert_eq!(v.location.latitude(), 46.9488);
        assert_eq!(v.location.longitude(), 7.4395);
        assert_eq!(v.battery_percent, Some(76.0));
        assert_eq!(v.provider, "Voi Technology AB");
    }

    #[test]
    fn both_response_shapes() {
        let bare = format!("[{FEATURE}]");
        let resp: IdentifyResponse = serde_json::from_str(&bare).unwrap();
        assert_eq!(resp.into_features().len(), 1);

        let wrapped = format!(r#"{{"results": [{FEATURE}, {FEATURE}]}}"#);
        let resp: IdentifyResponse = serde_json::from_str(&wrapped).unwrap();
        assert_eq!(resp.into_features().len(), 2);
    }

    #[test]
    fn numeric_feature_id_and_missing_battery() {
        let json = r#"{"id": 42, "attributes": {"provider_id": "voiscooters.com"},
                       "geometry": {"x": 7.44, "y": 46.95}}"#;
        let feature: FeatureDto = serde_json::from_str(json).unwrap();
        let v = feature.to_snapshot("Voi").unwrap();
        assert_eq!(v.id, "42");
        assert_eq!(v.battery_percent, None);
        assert_eq!(v.provider, "Voi");
    }

    #[test]
    fn reserved_is_unavailable() {
        let json = r#"{"id": "x", "attributes": {"vehicle_status_reserved": true}}"#;
        let feature: FeatureDto = serde_json::from_str(json).unwrap();
        assert!(!feature.is_available());
        assert!(matches!(feature.to_snapshot("Voi"), Err(FeatureError::NoGeometry)));
    }
}
