//! Trip requests.

use std::collections::BTreeSet;

use super::{Coordinate, DomainError, Mode};

/// A door-to-door planning request.
///
/// Coordinates are validated by construction; the enabled modes are not,
/// so that an empty selection reaches the planner and is rejected there
/// before any source is contacted.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub enabled_modes: BTreeSet<Mode>,
    /// Shared modes offered at transfer points. `None` offers the enabled
    /// shared modes.
    pub alternative_modes: Option<BTreeSet<Mode>>,
}

impl TripRequest {
    /// Create a new trip request.
    pub fn new(
        origin: Coordinate,
        destination: Coordinate,
        modes: impl IntoIterator<Item = Mode>,
    ) -> Self {
        Self {
            origin,
            destination,
            enabled_modes: modes.into_iter().collect(),
            alternative_modes: None,
        }
    }

    /// Offer exactly these modes as alternatives, independent of the
    /// enabled ones.
    pub fn with_alternative_modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.alternative_modes = Some(modes.into_iter().collect());
        self
    }

    pub fn is_enabled(&self, mode: Mode) -> bool {
        self.enabled_modes.contains(&mode)
    }

    /// Whether `mode` may appear as an alternative at a transfer point.
    pub fn offers_alternative(&self, mode: Mode) -> bool {
        let selected = match &self.alternative_modes {
            Some(modes) => modes.contains(&mode),
            None => self.is_enabled(mode),
        };
        mode.is_shared() && selected
    }

    /// Whether the snapshot behind `mode` is needed, for itineraries or
    /// for alternatives.
    pub fn needs_snapshot(&self, mode: Mode) -> bool {
        self.is_enabled(mode) || self.offers_alternative(mode)
    }

    /// Straight-line distance from origin to destination in meters.
    pub fn crow_distance_m(&self) -> f64 {
        self.origin.distance_m(&self.destination)
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.enabled_modes.is_empty() {
            return Err(DomainError::NoModesEnabled);
        }
        Ok(())
    }
}
