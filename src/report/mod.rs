//! Reporting: per-category method statistics and console formatting.

pub mod format;
pub mod stats;

pub use format::*;
pub use stats::*;
