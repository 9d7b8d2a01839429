//! Job/candidate matching: compatibility scoring for discovery and TOPSIS ranking of applicants.

pub mod config;
pub mod error;
pub mod geo;
pub mod matching;
pub mod telemetry;

pub use error::AppError;
