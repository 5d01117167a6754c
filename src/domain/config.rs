//! Run configuration.
//!
//! Settings are layered: built-in defaults, then environment overrides
//! (optionally loaded from `.env`), then command-line flags.

use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory (relative to the project root) holding input and output files.
pub const DATA_DIR: &str = "public";
pub const INPUT_FILE: &str = "analysis_with_methods.csv";
pub const OUTPUT_FILE: &str = "simulation_plots.png";

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_RESOLUTION: usize = 300;
pub const DEFAULT_WINDOW: usize = 3;

/// Largest accepted output resolution.
pub const MAX_DPI: u32 = 600;
/// Largest accepted bitmap, in pixels.
pub const MAX_PIXELS: f64 = 1.0e8;

/// Figure size in inches (width, height).
pub const FIGURE_SIZE_IN: (f64, f64) = (18.0, 14.0);

pub const ENV_PROJECT_ROOT: &str = "NETSIM_PROJECT_ROOT";
pub const ENV_DPI: &str = "GRAPH_DPI";
pub const ENV_RESOLUTION: &str = "GRAPH_INTERPOLATION_POINTS";
pub const ENV_FONT: &str = "NETSIM_FONT";

/// Smoother knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothOptions {
    /// Minimum number of grid points in a smoothed curve.
    pub resolution: usize,
    /// Minimum smoothing window. Accepted as configuration only; the
    /// interpolating smoother does not consume it.
    pub window: usize,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Resolved configuration for one `plot` run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_root: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dpi: u32,
    pub figure_size_in: (f64, f64),
    pub smooth: SmoothOptions,
    pub export_curves: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
}

impl Settings {
    /// Defaults for a project rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        Self {
            input_path: default_input_path(&project_root),
            output_path: default_output_path(&project_root),
            project_root,
            dpi: DEFAULT_DPI,
            figure_size_in: FIGURE_SIZE_IN,
            smooth: SmoothOptions::default(),
            export_curves: None,
            font_path: None,
        }
    }

    /// Pixel dimensions of the rendered figure.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size_in;
        let dpi = self.dpi as f64;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(AppError::settings(format!("DPI must be between 1 and {MAX_DPI}.")));
        }
        if self.smooth.resolution < 2 {
            return Err(AppError::settings("Smoothing resolution must be >= 2."));
        }
        let (w, h) = self.figure_size_in;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(AppError::settings("Figure size must be finite and > 0."));
        }
        let dpi = self.dpi as f64;
        let pixels = (w * dpi).round() * (h * dpi).round();
        if pixels > MAX_PIXELS {
            return Err(AppError::settings(format!(
                "Figure of {w}x{h} in at {} dpi exceeds {MAX_PIXELS:.0} pixels.",
                self.dpi
            )));
        }
        Ok(())
    }
}

pub fn default_input_path(root: &Path) -> PathBuf {
    root.join(DATA_DIR).join(INPUT_FILE)
}

pub fn default_output_path(root: &Path) -> PathBuf {
    root.join(DATA_DIR).join(OUTPUT_FILE)
}

/// Optional overrides read from the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub project_root: Option<PathBuf>,
    pub dpi: Option<u32>,
    pub resolution: Option<usize>,
    pub font_path: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let dpi = get(ENV_DPI)
            .map(|v| parse_positive::<u32>(ENV_DPI, &v))
            .transpose()?;
        let resolution = get(ENV_RESOLUTION)
            .map(|v| parse_positive::<usize>(ENV_RESOLUTION, &v))
            .transpose()?;

        Ok(Self {
            project_root: get(ENV_PROJECT_ROOT).map(PathBuf::from),
            dpi,
            resolution,
            font_path: get(ENV_FONT).map(PathBuf::from),
        })
    }
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(AppError::settings(format!(
            "Invalid `{key}` value '{value}' (expected a positive integer)."
        ))),
    }
}
