//! Command-line parsing for the NS-3 results visualizer.
//!
//! Parsing and dispatch live apart from the pipeline so the library can be
//! driven directly from tests.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "netsim-viz", version, about = "NS-3 simulation results visualizer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot the method comparison figure and print per-method statistics.
    Plot(PlotArgs),
    /// Write a synthetic observation table in the simulator's CSV schema.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone, Default)]
pub struct PlotArgs {
    /// Project root holding `public/` (overrides NETSIM_PROJECT_ROOT).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Input CSV (default: <root>/public/analysis_with_methods.csv).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Output PNG (default: <root>/public/simulation_plots.png).
    #[arg(long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Output resolution in dots per inch (overrides GRAPH_DPI).
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Minimum points per smoothed curve (overrides GRAPH_INTERPOLATION_POINTS).
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Also write every smoothed curve to a JSON file.
    #[arg(long = "export-curves", value_name = "JSON")]
    pub export_curves: Option<PathBuf>,

    /// TrueType font for chart text (overrides NETSIM_FONT).
    #[arg(long, value_name = "TTF")]
    pub font: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Project root; the table is written to <root>/public/analysis_with_methods.csv.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Explicit output CSV path.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = crate::data::DEFAULT_SEED)]
    pub seed: u64,

    /// Relative standard deviation of the multiplicative noise.
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,

    #[arg(long, default_value_t = 0.1)]
    pub lambda_start: f64,

    #[arg(long, default_value_t = 2.0)]
    pub lambda_end: f64,

    #[arg(long, default_value_t = 0.1)]
    pub lambda_step: f64,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}
