//! Series preparation and smoothing.
//!
//! Responsibilities:
//!
//! - turn a column of the observation table into an ordered, finite series
//! - densify a series into a presentable curve via cubic / linear interpolation

pub mod prepare;
pub mod smoother;

pub use prepare::*;
pub use smoother::*;
