//! HealthHub profile: wizard pipeline for the patient health profile.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod profile;
pub mod refresh;
pub mod session;
pub mod submission;
pub mod wizard;
