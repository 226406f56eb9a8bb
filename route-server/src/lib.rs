//! Multimodal route planner server.
//!
//! A web application that answers: "How do I get from here to there by
//! public transport, shared bike or e-scooter, and where along the way
//! could I switch?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod planner;
pub mod sources;
pub mod web;
