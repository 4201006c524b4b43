//! Photovoltaic string sizing against inverter MPPT limits, with a battery
//! autonomy estimator.

#[cfg(feature = "api")]
pub mod api;
/// Battery runtime matrix.
pub mod autonomy;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
/// Temperature derating, string model, compliance checks and array sizing.
pub mod sizing;

pub use error::SizingError;
