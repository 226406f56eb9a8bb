//! Itinerary segmentation.
//!
//! Cuts a raw leg sequence into presentation segments. A run of walking
//! legs is folded into the ride it leads to, so `walk → bus → walk`
//! becomes two segments: the walk and the bus together, then the final
//! walk. A transfer point sits after every ride leg except the last leg,
//! which is where the traveller could get off and continue differently.

use chrono::{DateTime, Utc};

use crate::domain::{
    CandidateItinerary, Coordinate, Leg, LegMode, Segment, SegmentedItinerary, TransferPoint,
};

use super::rank::{Estimator, round_minutes};

/// Why an itinerary could not be segmented.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    #[error("itinerary has no legs")]
    NoLegs,

    #[error("leg {index} has an invalid {field}")]
    InvalidLeg { index: usize, field: &'static str },

    #[error("legs {index} and {} are {gap_m:.0} m apart", .index + 1)]
    Discontinuous { index: usize, gap_m: f64 },
}

/// Turns candidate itineraries into segmented ones.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    estimator: Estimator,
    max_leg_gap_m: f64,
}

impl Segmenter {
    pub fn new(estimator: Estimator, max_leg_gap_m: f64) -> Self {
        Self {
            estimator,
            max_leg_gap_m,
        }
    }

    /// Segment an itinerary whose endpoints are anchored at `origin` and
    /// `destination`.
    pub fn segment(
        &self,
        itinerary: CandidateItinerary,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<SegmentedItinerary, SegmentError> {
        self.validate(&itinerary.legs)?;

        let groups = group_legs(&itinerary.legs);

        let mut transfer_points = Vec::with_capacity(groups.len() + 1);
        transfer_points.push(endpoint(
            &itinerary.legs[0].from_name,
            "Origin",
            origin,
            None,
            itinerary.legs[0].departs_at,
        ));

        for (i, pair) in groups.windows(2).enumerate() {
            let (arriving, departing) = (&pair[0], &pair[1]);
            let last = &arriving[arriving.len() - 1];
            transfer_points.push(TransferPoint {
                name: last.to_name.clone(),
                location: last.to,
                is_station_backed: last.to_kind.is_station(),
                index: i + 1,
                arrival: last.arrives_at,
                departure: departing[0].departs_at,
            });
        }

        let last_leg = &itinerary.legs[itinerary.legs.len() - 1];
        let mut destination_point = endpoint(
            &last_leg.to_name,
            "Destination",
            destination,
            last_leg.arrives_at,
            None,
        );
        destination_point.index = groups.len();
        transfer_points.push(destination_point);

        let segments = groups
            .iter()
            .enumerate()
            .map(|(i, legs)| self.build_segment(i, legs, &transfer_points))
            .collect();

        Ok(SegmentedItinerary {
            itinerary,
            transfer_points,
            segments,
        })
    }

    fn validate(&self, legs: &[Leg]) -> Result<(), SegmentError> {
        if legs.is_empty() {
            return Err(SegmentError::NoLegs);
        }

        for (index, leg) in legs.iter().enumerate() {
            if !leg.distance_meters.is_finite() || leg.distance_meters < 0.0 {
                return Err(SegmentError::InvalidLeg {
                    index,
                    field: "distance",
                });
            }
            if leg
                .duration_minutes
                .is_some_and(|d| !d.is_finite() || d < 0.0)
            {
                return Err(SegmentError::InvalidLeg {
                    index,
                    field: "duration",
                });
            }
        }

        for (index, pair) in legs.windows(2).enumerate() {
            let gap_m = pair[0].to.distance_m(&pair[1].from);
            if gap_m > self.max_leg_gap_m {
                return Err(SegmentError::Discontinuous { index, gap_m });
            }
        }

        Ok(())
    }

    fn build_segment(&self, i: usize, legs: &[Leg], points: &[TransferPoint]) -> Segment {
        let ride = legs.iter().find(|l| !l.mode.is_walk());

        Segment {
            id: format!("seg-{}", i + 1),
            from: points[i].clone(),
            to: points[i + 1].clone(),
            mode: ride.map_or(LegMode::Walk, |l| l.mode),
            duration_minutes: round_minutes(legs.iter().map(|l| self.estimator.leg_minutes(l)).sum()),
            distance_meters: legs.iter().map(|l| l.distance_meters).sum(),
            line_name: ride.and_then(|l| l.line_name.clone()),
            legs: legs.to_vec(),
            alternatives: Vec::new(),
        }
    }
}

/// Split legs into segment groups: each group ends with a ride leg, except
/// possibly the last, which collects trailing walks.
fn group_legs(legs: &[Leg]) -> Vec<&[Leg]> {
    let mut groups = Vec::new();
    let mut start = 0;

    for (i, leg) in legs.iter().enumerate() {
        if !leg.mode.is_walk() {
            groups.push(&legs[start..=i]);
            start = i + 1;
        }
    }
    if start < legs.len() {
        groups.push(&legs[start..]);
    }

    groups
}

fn endpoint(
    name: &str,
    fallback: &str,
    location: Coordinate,
    arrival: Option<DateTime<Utc>>,
    departure: Option<DateTime<Utc>>,
) -> TransferPoint {
    TransferPoint {
        name: if name.is_empty() { fallback } else { name }.to_string(),
        location,
        is_station_backed: false,
        index: 0,
        arrival,
        departure,
    }
}
