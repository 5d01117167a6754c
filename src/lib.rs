//! `netsim-viz` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - the smoother and figure model are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod smooth;
