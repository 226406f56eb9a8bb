//! Planner configuration.

use std::time::Duration;

use super::rank::{BadgeThresholds, Estimator, RankWeights, Speeds, Tariffs};

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Upper bound on each source call. Calls run concurrently, so this is
    /// also roughly the upper bound on the whole fan-out.
    pub adapter_timeout: Duration,

    /// Maximum number of transit itineraries kept.
    pub max_transit_itineraries: usize,

    /// How far from the origin (and destination) a shared vehicle or
    /// station may be for a bike or scooter itinerary (meters).
    pub shared_access_radius_m: f64,

    /// Maximum number of bike-share itineraries (one per start station).
    pub max_bike_itineraries: usize,

    /// Number of vehicles listed as nearby on a scooter itinerary.
    pub max_nearby_vehicles: usize,

    /// Candidates examined per mode at a transfer point.
    pub alternative_candidates: usize,

    /// Search radius around a transfer point for alternatives (meters).
    pub alternative_radius_m: f64,

    /// Maximum alternatives per transfer point.
    pub max_alternatives: usize,

    /// Added to half the trip length when sizing the snapshot area (meters).
    /// Must cover `alternative_radius_m` so transfer points near the trip
    /// endpoints still see their surroundings.
    pub search_margin_m: f64,

    /// Consecutive legs further apart than this make an itinerary
    /// inconsistent (meters).
    pub max_leg_gap_m: f64,

    /// Battery level below which a scooter is flagged (percent).
    pub low_battery_percent: f64,

    pub tariffs: Tariffs,
    pub speeds: Speeds,
    pub weights: RankWeights,
    pub badges: BadgeThresholds,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(10),
            max_transit_itineraries: 3,
            shared_access_radius_m: 300.0,
            max_bike_itineraries: 2,
            max_nearby_vehicles: 5,
            alternative_candidates: 5,
            alternative_radius_m: 800.0,
            max_alternatives: 5,
            search_margin_m: 800.0,
            max_leg_gap_m: 25.0,
            low_battery_percent: 20.0,
            tariffs: Tariffs::default(),
            speeds: Speeds::default(),
            weights: RankWeights::default(),
            badges: BadgeThresholds::default(),
        }
    }
}

impl PlannerConfig {
    /// Set the per-source timeout.
    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    /// Set the maximum number of alternatives per transfer point.
    pub fn with_max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }

    /// Set the badge thresholds.
    pub fn with_badges(mut self, fast_minutes: f64, affordable_chf: f64) -> Self {
        self.badges = BadgeThresholds {
            fast_minutes,
            affordable_chf,
        };
        self
    }

    /// Set the tariffs.
    pub fn with_tariffs(mut self, tariffs: Tariffs) -> Self {
        self.tariffs = tariffs;
        self
    }

    /// Estimator built from the configured tariffs and speeds.
    pub fn estimator(&self) -> Estimator {
        Estimator::new(self.tariffs, self.speeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.adapter_timeout, Duration::from_secs(10));
        assert_eq!(config.max_transit_itineraries, 3);
        assert_eq!(config.shared_access_radius_m, 300.0);
        assert_eq!(config.alternative_candidates, 5);
        assert_eq!(config.alternative_radius_m, 800.0);
        assert_eq!(config.max_alternatives, 5);
        assert_eq!(config.max_leg_gap_m, 25.0);
        assert_eq!(config.low_battery_percent, 20.0);
        assert!(config.search_margin_m >= config.alternative_radius_m);
    }

    #[test]
    fn builder_setters() {
        let config = PlannerConfig::default()
            .with_adapter_timeout(Duration::from_secs(8))
            .with_max_alternatives(2)
            .with_badges(10.0, 3.0);

        assert_eq!(config.adapter_timeout, Duration::from_secs(8));
        assert_eq!(config.max_alternatives, 2);
        assert_eq!(config.badges.fast_minutes, 10.0);
        assert_eq!(config.badges.affordable_chf, 3.0);
    }

    #[test]
    fn estimator_uses_configured_tariffs() {
        let mut tariffs = Tariffs::default();
        tariffs.transit.base_chf = 3.0;
        let config = PlannerConfig::default().with_tariffs(tariffs);

        assert_eq!(config.estimator().cost(crate::domain::Mode::Transit, 20.0), 3.0);
    }
}
