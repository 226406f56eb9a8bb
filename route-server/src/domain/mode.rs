//! Mobility service modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0}")]
pub struct UnknownMode(pub String);

/// One of the three mobility services the planner combines.
///
/// The serialized names (`public_transport`, `publibike`, `e_scooter`) are
/// the ones existing clients send and expect, so they must not change.
///
/// `Ord` follows fan-out order (transit first). Use [`Mode::priority`] for
/// tie-breaking between alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "public_transport")]
    Transit,
    #[serde(rename = "publibike")]
    BikeShare,
    #[serde(rename = "e_scooter")]
    ScooterShare,
}

impl Mode {
    /// All modes, in fan-out order.
    pub const ALL: [Mode; 3] = [Mode::Transit, Mode::BikeShare, Mode::ScooterShare];

    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Transit => "public_transport",
            Mode::BikeShare => "publibike",
            Mode::ScooterShare => "e_scooter",
        }
    }

    /// Generic service category, independent of the operator.
    pub fn kind(&self) -> &'static str {
        match self {
            Mode::Transit => "transit",
            Mode::BikeShare => "bike_share",
            Mode::ScooterShare => "scooter_share",
        }
    }

    /// Tie-break order for equally ranked alternatives (lower wins).
    pub fn priority(&self) -> u8 {
        match self {
            Mode::BikeShare => 0,
            Mode::ScooterShare => 1,
            Mode::Transit => 2,
        }
    }

    /// Whether the mode is backed by a live station/vehicle inventory.
    pub fn is_shared(&self) -> bool {
        matches!(self, Mode::BikeShare | Mode::ScooterShare)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    /// Accepts the wire names as well as the category names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public_transport" | "transit" => Ok(Mode::Transit),
            "publibike" | "bike_share" => Ok(Mode::BikeShare),
            "e_scooter" | "scooter_share" => Ok(Mode::ScooterShare),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            let back: Mode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mode);
        }
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("transit".parse::<Mode>().unwrap(), Mode::Transit);
        assert_eq!("Bike_Share".parse::<Mode>().unwrap(), Mode::BikeShare);
        assert_eq!(" scooter_share ".parse::<Mode>().unwrap(), Mode::ScooterShare);
        assert_eq!(
            "car".parse::<Mode>().unwrap_err().to_string(),
            "unknown mode: car"
        );
    }

    #[test]
    fn priority_prefers_bike_over_scooter() {
        assert!(Mode::BikeShare.priority() < Mode::ScooterShare.priority());
        assert!(Mode::ScooterShare.priority() < Mode::Transit.priority());
    }

    #[test]
    fn ordering_is_fan_out_order() {
        let mut modes = vec![Mode::ScooterShare, Mode::Transit, Mode::BikeShare];
        modes.sort();
        assert_eq!(modes, Mode::ALL.to_vec());
    }

    #[test]
    fn shared_modes() {
        assert!(!Mode::Transit.is_shared());
        assert!(Mode::BikeShare.is_shared());
        assert!(Mode::ScooterShare.is_shared());
    }
}
