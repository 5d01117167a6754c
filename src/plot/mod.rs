//! Renderer: compose smoothed curves into the 2×2 comparison figure.
//!
//! - `figure`: pure data model (`Figure`, `Panel`, `Curve`) built from a table
//! - `draw`: Plotters drawing of a `Figure` onto any drawing backend
//! - `font`: TrueType discovery/registration for chart text

pub mod draw;
pub mod figure;
pub mod font;

pub use draw::*;
pub use figure::*;
pub use font::*;
