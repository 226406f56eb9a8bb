//! OpenTripPlanner (OTP) transit adapter.
//!
//! Talks to the OTP 1.x/2.x REST plan endpoint and converts its
//! itineraries to `CandidateItinerary` values. Walk-only itineraries are
//! passed through here; the aggregator decides what to keep.

mod client;
mod convert;
mod types;

pub use client::{OtpClient, OtpConfig};
pub use convert::{ConversionError, convert_plan};
pub use types::PlanResponse;
