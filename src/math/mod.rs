//! Numerical utilities: grids, linear systems, and interpolants.

pub mod interp;
pub mod solve;
pub mod spline;

pub use interp::*;
pub use solve::*;
pub use spline::*;
