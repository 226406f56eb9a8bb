//! Conversion from OTP DTOs to domain types.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    CandidateItinerary, Coordinate, InvalidCoordinate, Leg, LegMode, Mode, ModeDetails, PlaceKind,
};

use crate::sources::TransitPlan;

use super::types::{ItineraryDto, LegDto, PlaceDto, PlanResponse};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

/// Convert a plan response into candidate itineraries.
///
/// An itinerary that fails to convert does not fail the plan; it is
/// listed in [`TransitPlan::rejected`] so the caller can report it.
/// Structural checks such as "has at least one leg" belong to the
/// segmenter, so zero-leg itineraries are passed through.
pub fn convert_plan(response: &PlanResponse) -> TransitPlan {
    let Some(plan) = &response.plan else {
        return TransitPlan::default();
    };

    let mut converted = TransitPlan::default();
    for (i, dto) in plan.itineraries.iter().enumerate() {
        match convert_itinerary(dto) {
            Ok(itinerary) => converted.itineraries.push(itinerary),
            Err(e) => {
                warn!(index = i, error = %e, "Unconvertible OTP itinerary");
                converted.rejected.push(format!("itinerary {}: {e}", i + 1));
            }
        }
    }
    converted
}

/// Convert a single OTP itinerary.
pub fn convert_itinerary(dto: &ItineraryDto) -> Result<CandidateItinerary, ConversionError> {
    let legs = dto
        .legs
        .iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    let duration_minutes = dto.duration.map(|s| s / 60.0);
    let cost_chf = dto
        .fare
        .as_ref()
        .and_then(|f| f.fare.get("regular").or_else(|| f.fare.values().next()))
        .map(|m| m.cents as f64 / 100.0);

    Ok(CandidateItinerary {
        mode: Mode::Transit,
        summary: summarize(dto),
        legs,
        duration_minutes,
        cost_chf,
        warning: None,
        details: ModeDetails::Transit {
            transfers: dto.transfers.unwrap_or(0),
            walk_distance_m: dto.walk_distance.unwrap_or(0.0),
        },
    })
}

fn convert_leg(dto: &LegDto) -> Result<Leg, ConversionError> {
    let from = Coordinate::new(dto.from.lat, dto.from.lon)?;
    let to = Coordinate::new(dto.to.lat, dto.to.lon)?;
    let mode = LegMode::from_otp(&dto.mode);

    let mut leg = Leg::new(mode, place_name(&dto.from), from, place_name(&dto.to), to)
        .with_kinds(place_kind(&dto.from), place_kind(&dto.to));

    if let Some(distance) = dto.distance {
        leg.distance_meters = distance;
    }
    leg.duration_minutes = dto.duration.map(|s| s / 60.0);
    leg.line_name = dto
        .route_short_name
        .clone()
        .or_else(|| dto.route.clone())
        .filter(|s| !s.is_empty());
    leg.headsign = dto.headsign.clone();
    leg.departs_at = dto.start_time.and_then(from_epoch_millis);
    leg.arrives_at = dto.end_time.and_then(from_epoch_millis);

    Ok(leg)
}

fn place_name(place: &PlaceDto) -> String {
    place.name.clone().unwrap_or_default()
}

fn place_kind(place: &PlaceDto) -> PlaceKind {
    match place.vertex_type.as_deref() {
        Some("TRANSIT") => PlaceKind::TransitStop,
        Some("BIKESHARE") => PlaceKind::BikeStation,
        _ if place.stop_id.is_some() => PlaceKind::TransitStop,
        _ => PlaceKind::Street,
    }
}

fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Human-readable summary, e.g. `Walk 5 min → Bus 10 → Walk 3 min (32 min total)`.
fn summarize(dto: &ItineraryDto) -> String {
    let parts: Vec<String> = dto
        .legs
        .iter()
        .map(|leg| {
            let mode = LegMode::from_otp(&leg.mode);
            if mode.is_walk() {
                let minutes = (leg.duration.unwrap_or(0.0) / 60.0).round();
                return format!("Walk {minutes} min");
            }
            match leg.route_short_name.as_deref().or(leg.route.as_deref()) {
                Some(route) if mode.is_transit() && !route.is_empty() => {
                    format!("{} {route}", mode.label())
                }
                _ => mode.label().to_string(),
            }
        })
        .collect();

    let total = (dto.duration.unwrap_or(0.0) / 60.0 * 10.0).round() / 10.0;
    format!("{} ({total} min total)", parts.join(" → "))
}
