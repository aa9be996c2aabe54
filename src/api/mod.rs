//! Remote profile backend.

pub mod client;
pub mod envelope;

pub use client::{HttpProfileApi, ProfileApi};
pub use envelope::Envelope;
