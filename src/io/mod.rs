//! Input/output helpers.
//!
//! - CSV ingest + schema validation (`ingest`)
//! - observation table CSV writer (`export`)
//! - smoothed-curve JSON export (`curve`)
//! - PNG output of the composed figure (`image`)

pub mod curve;
pub mod export;
pub mod image;
pub mod ingest;

pub use self::curve::*;
pub use self::export::*;
pub use self::image::*;
pub use self::ingest::*;
