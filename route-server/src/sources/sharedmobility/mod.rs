//! sharedmobility.ch scooter-share adapter.
//!
//! Queries the federal sharedmobility.ch aggregator for Voi e-scooters
//! around the trip and drops vehicles that are reserved or disabled.

mod client;
mod types;

pub use client::{SharedMobilityClient, SharedMobilityConfig, VOI_PROVIDER_ID};
pub use types::{FeatureDto, FeatureError, IdentifyResponse};
