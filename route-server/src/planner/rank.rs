//! Estimation and ranking.
//!
//! Fills in the durations and costs sources leave out, and orders
//! alternatives by a composite score. All tariffs and speeds are plain
//! values so they can be tuned per deployment.

use std::cmp::Ordering;

use crate::domain::{Alternative, Badge, CandidateItinerary, Leg, LegMode, Mode};

/// Round a duration to 0.1 minutes.
pub fn round_minutes(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}

/// Round an amount to 0.01 CHF.
pub fn round_chf(chf: f64) -> f64 {
    (chf * 100.0).round() / 100.0
}

/// A base fare plus a per-minute rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub base_chf: f64,
    pub per_minute_chf: f64,
}

impl Tariff {
    pub fn cost(&self, ride_minutes: f64) -> f64 {
        self.base_chf + self.per_minute_chf * ride_minutes.max(0.0)
    }
}

/// Tariffs per mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariffs {
    /// Flat single-journey fare.
    pub transit: Tariff,
    pub bike_share: Tariff,
    pub scooter_share: Tariff,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            transit: Tariff {
                base_chf: 4.60,
                per_minute_chf: 0.0,
            },
            bike_share: Tariff {
                base_chf: 2.90,
                per_minute_chf: 0.05,
            },
            scooter_share: Tariff {
                base_chf: 1.00,
                per_minute_chf: 0.29,
            },
        }
    }
}

impl Tariffs {
    pub fn for_mode(&self, mode: Mode) -> Tariff {
        match mode {
            Mode::Transit => self.transit,
            Mode::BikeShare => self.bike_share,
            Mode::ScooterShare => self.scooter_share,
        }
    }
}

/// Average speeds used when a source gives no duration, in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speeds {
    pub walk_kmh: f64,
    pub cycle_kmh: f64,
    pub scooter_kmh: f64,
    /// Any scheduled vehicle, and anything else without a better guess.
    pub transit_kmh: f64,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            walk_kmh: 4.5,
            cycle_kmh: 14.0,
            scooter_kmh: 18.0,
            transit_kmh: 20.0,
        }
    }
}

impl Speeds {
    pub fn for_leg(&self, mode: LegMode) -> f64 {
        match mode {
            LegMode::Walk => self.walk_kmh,
            LegMode::Bicycle => self.cycle_kmh,
            LegMode::Scooter => self.scooter_kmh,
            _ => self.transit_kmh,
        }
    }
}

/// Minutes needed to cover `distance_m` at `kmh`.
///
/// ```
/// use route_server::planner::travel_minutes;
///
/// assert_eq!(travel_minutes(1500.0, 4.5), 20.0);
/// ```
pub fn travel_minutes(distance_m: f64, kmh: f64) -> f64 {
    if kmh <= 0.0 {
        return 0.0;
    }
    distance_m.max(0.0) / (kmh * 1000.0 / 60.0)
}

/// Duration and cost estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Estimator {
    pub tariffs: Tariffs,
    pub speeds: Speeds,
}

impl Estimator {
    pub fn new(tariffs: Tariffs, speeds: Speeds) -> Self {
        Self { tariffs, speeds }
    }

    /// Reported leg duration, or distance at the leg mode's average speed.
    pub fn leg_minutes(&self, leg: &Leg) -> f64 {
        leg.duration_minutes
            .unwrap_or_else(|| travel_minutes(leg.distance_meters, self.speeds.for_leg(leg.mode)))
    }

    /// Minutes spent on non-walking legs.
    pub fn ride_minutes(&self, itinerary: &CandidateItinerary) -> f64 {
        itinerary
            .legs
            .iter()
            .filter(|l| !l.mode.is_walk())
            .map(|l| self.leg_minutes(l))
            .sum()
    }

    /// Fare for `ride_minutes` on `mode`.
    pub fn cost(&self, mode: Mode, ride_minutes: f64) -> f64 {
        round_chf(self.tariffs.for_mode(mode).cost(ride_minutes))
    }

    /// Ensure the itinerary carries a duration and a cost, both rounded.
    ///
    /// Values the source provided are kept; only missing ones are estimated.
    pub fn fill(&self, itinerary: &mut CandidateItinerary) {
        let duration = itinerary
            .duration_minutes
            .unwrap_or_else(|| itinerary.legs.iter().map(|l| self.leg_minutes(l)).sum());
        itinerary.duration_minutes = Some(round_minutes(duration));

        let cost = itinerary
            .cost_chf
            .unwrap_or_else(|| self.cost(itinerary.mode, self.ride_minutes(itinerary)));
        itinerary.cost_chf = Some(round_chf(cost));
    }
}

/// Weights of the composite alternative score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    pub per_minute: f64,
    pub per_chf: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            per_minute: 1.0,
            per_chf: 0.5,
        }
    }
}

impl RankWeights {
    /// Lower is better. Unknown cost counts as free.
    pub fn score(&self, duration_minutes: f64, cost_chf: Option<f64>) -> f64 {
        self.per_minute * duration_minutes + self.per_chf * cost_chf.unwrap_or(0.0)
    }
}

/// Thresholds for presentation badges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeThresholds {
    pub fast_minutes: f64,
    pub affordable_chf: f64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            fast_minutes: 15.0,
            affordable_chf: 4.0,
        }
    }
}

impl BadgeThresholds {
    pub fn badges(&self, duration_minutes: f64, cost_chf: Option<f64>) -> Vec<Badge> {
        let mut badges = Vec::new();
        if duration_minutes <= self.fast_minutes {
            badges.push(Badge::Fast);
        }
        if cost_chf.is_some_and(|c| c <= self.affordable_chf) {
            badges.push(Badge::Affordable);
        }
        badges
    }
}

/// Sort alternatives best-first and keep at most `max`.
///
/// Ordered by rank score, then by mode priority. The sort is stable, so
/// alternatives equal on both keep their generation order.
pub fn rank_alternatives(alternatives: &mut Vec<Alternative>, max: usize) {
    alternatives.sort_by(|a, b| {
        a.rank_score
            .partial_cmp(&b.rank_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.mode.priority().cmp(&b.mode.priority()))
    });
    alternatives.truncate(max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, ModeDetails};

    fn alt(mode: Mode, score: f64) -> Alternative {
        Alternative {
            mode,
            summary: format!("{mode} {score}"),
            duration_minutes: score,
            cost_chf: None,
            distance_km: None,
            reference: None,
            rank_score: score,
            badges: vec![],
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_minutes(12.345), 12.3);
        assert_eq!(round_minutes(12.36), 12.4);
        assert_eq!(round_chf(4.6049), 4.6);
        assert_eq!(round_chf(3.125), 3.13);
    }

    #[test]
    fn default_tariffs() {
        let e = Estimator::default();
        assert_eq!(e.cost(Mode::Transit, 30.0), 4.6);
        assert_eq!(e.cost(Mode::BikeShare, 10.0), 3.4);
        assert_eq!(e.cost(Mode::ScooterShare, 10.0), 3.9);
    }

    #[test]
    fn walking_speed() {
        // 4.5 km/h is 75 m/min
        assert_eq!(travel_minutes(750.0, 4.5), 10.0);
        assert_eq!(travel_minutes(-5.0, 4.5), 0.0);
        assert_eq!(travel_minutes(100.0, 0.0), 0.0);
    }

    #[test]
    fn fill_estimates_missing_values() {
        let a = Coordinate::new(46.9480, 7.4400).unwrap();
        let b = Coordinate::new(46.9476, 7.4474).unwrap();
        let mut walk = Leg::new(LegMode::Walk, "A", a, "B", b);
        walk.distance_meters = 150.0;
        let mut ride = Leg::new(LegMode::Bicycle, "B", b, "A", a);
        ride.distance_meters = 1400.0;

        let mut itinerary = CandidateItinerary {
            mode: Mode::BikeShare,
            legs: vec![walk, ride],
            summary: String::new(),
            duration_minutes: None,
            cost_chf: None,
            warning: None,
            details: ModeDetails::Transit {
                transfers: 0,
                walk_distance_m: 0.0,
            },
        };

        let e = Estimator::default();
        e.fill(&mut itinerary);

        // 150 m walk = 2 min, 1400 m at 14 km/h = 6 min
        assert_eq!(itinerary.duration_minutes, Some(8.0));
        assert_eq!(itinerary.cost_chf, Some(3.2));
    }

    #[test]
    fn fill_keeps_source_values() {
        let a = Coordinate::new(46.9480, 7.4400).unwrap();
        let mut itinerary = CandidateItinerary {
            mode: Mode::Transit,
            legs: vec![Leg::new(LegMode::Bus, "A", a, "A", a).with_duration(7.0)],
            summary: String::new(),
            duration_minutes: Some(18.04),
            cost_chf: Some(3.8),
            warning: None,
            details: ModeDetails::Transit {
                transfers: 0,
                walk_distance_m: 0.0,
            },
        };

        Estimator::default().fill(&mut itinerary);
        assert_eq!(itinerary.duration_minutes, Some(18.0));
        assert_eq!(itinerary.cost_chf, Some(3.8));
    }

    #[test]
    fn score_and_badges() {
        let w = RankWeights::default();
        assert_eq!(w.score(10.0, Some(4.0)), 12.0);
        assert_eq!(w.score(10.0, None), 10.0);

        let t = BadgeThresholds::default();
        assert_eq!(t.badges(15.0, Some(4.0)), vec![Badge::Fast, Badge::Affordable]);
        assert_eq!(t.badges(15.1, Some(4.01)), vec![]);
        assert_eq!(t.badges(9.0, None), vec![Badge::Fast]);
    }

    #[test]
    fn ties_broken_by_mode_priority() {
        let mut alts = vec![
            alt(Mode::ScooterShare, 10.0),
            alt(Mode::BikeShare, 10.0),
            alt(Mode::ScooterShare, 5.0),
        ];
        rank_alternatives(&mut alts, 5);

        assert_eq!(alts[0].mode, Mode::ScooterShare);
        assert_eq!(alts[0].rank_score, 5.0);
        assert_eq!(alts[1].mode, Mode::BikeShare);
        assert_eq!(alts[2].mode, Mode::ScooterShare);
    }

    #[test]
    fn capped_at_max() {
        let mut alts: Vec<_> = (0..8).map(|i| alt(Mode::BikeShare, f64::from(8 - i))).collect();
        rank_alternatives(&mut alts, 5);
        assert_eq!(alts.len(), 5);
        assert_eq!(alts[0].rank_score, 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_strategy() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::BikeShare), Just(Mode::ScooterShare)]
    }

    fn alternatives_strategy() -> impl Strategy<Value = Vec<Alternative>> {
        prop::collection::vec((mode_strategy(), 0.0f64..120.0, 0.0f64..20.0), 0..12).prop_map(
            |items| {
                items
                    .into_iter()
                    .map(|(mode, minutes, cost)| Alternative {
                        mode,
                        summary: String::new(),
                        duration_minutes: minutes,
                        cost_chf: Some(cost),
                        distance_km: None,
                        reference: None,
                        rank_score: RankWeights::default().score(minutes, Some(cost)),
                        badges: vec![],
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Ranked alternatives are in non-decreasing score order
        #[test]
        fn ranked_is_sorted(mut alts in alternatives_strategy(), max in 0usize..8) {
            let before = alts.len();
            rank_alternatives(&mut alts, max);

            prop_assert_eq!(alts.len(), before.min(max));
            for pair in alts.windows(2) {
                prop_assert!(pair[0].rank_score <= pair[1].rank_score);
            }
        }

        /// Costs are never negative, whatever the duration
        #[test]
        fn cost_non_negative(minutes in -10.0f64..500.0) {
            let e = Estimator::default();
            for mode in Mode::ALL {
                prop_assert!(e.cost(mode, minutes) >= 0.0);
            }
        }
    }
}
