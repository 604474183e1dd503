//! Wire types for the scoring service

pub mod message;
pub mod prediction;

pub use message::ScoringRequest;
pub use prediction::Prediction;
