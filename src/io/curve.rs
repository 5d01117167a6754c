//! Smoothed-curve JSON export.
//!
//! The export is the portable form of everything drawn on the figure: for
//! each panel curve, its network, method, interpolation tier and dense points.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{InterpolationKind, Metric, NetworkType, SmoothOptions};
use crate::error::AppError;
use crate::plot::Figure;

#[derive(Debug, Clone, Serialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Local>,
    pub resolution: usize,
    pub curves: Vec<CurveRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveRecord {
    pub network: NetworkType,
    pub metric: Metric,
    pub panel: String,
    pub unit: &'static str,
    pub interpolation: InterpolationKind,
    pub lambda: Vec<f64>,
    pub value: Vec<f64>,
}

impl CurveFile {
    pub fn from_figure(figure: &Figure, options: &SmoothOptions) -> Self {
        let curves = figure
            .panels
            .iter()
            .flat_map(|panel| {
                panel.curves.iter().map(move |curve| CurveRecord {
                    network: curve.network,
                    metric: curve.metric,
                    panel: panel.title.clone(),
                    unit: if curve.metric.is_delay() { "ms" } else { "Mbit/s" },
                    interpolation: curve.smoothed.kind,
                    lambda: curve.smoothed.loads.clone(),
                    value: curve.smoothed.values.clone(),
                })
            })
            .collect();

        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Local::now(),
            resolution: options.resolution,
            curves,
        }
    }
}

/// Write every curve of `figure` as pretty JSON.
pub fn write_curves_json(path: &Path, figure: &Figure, options: &SmoothOptions) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &CurveFile::from_figure(figure, options))
        .map_err(|e| AppError::output(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}
