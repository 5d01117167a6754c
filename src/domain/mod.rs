//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input vocabulary (`NetworkType`, `Metric`, required column names)
//! - typed observations loaded from the simulator table (`ObservationTable`)
//! - prepared and smoothed series (`Series`, `SmoothedCurve`)
//! - run configuration (`Settings`, `SmoothOptions`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
