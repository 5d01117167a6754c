//! The plot pipeline shared by the CLI and the integration tests.
//!
//! load -> report shape -> validate columns -> prepare/smooth/compose
//! -> report statistics -> write image -> write curve export
//!
//! Report text is emitted to `out` as soon as it is known, so a later failure
//! still leaves the diagnostics and statistics on screen. Nothing is written
//! to disk when loading or column validation fails.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::domain::Settings;
use crate::error::AppError;
use crate::io::{load_table, write_curves_json, write_figure_png};
use crate::plot::build_figure;
use crate::report::{Summary, format_dataset_overview, format_load_diagnostics, format_summary, summarize};

/// Everything a `plot` run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub load_diagnostics: String,
    pub overview: String,
    pub summary: Summary,
    pub report: String,
    pub output_path: PathBuf,
    pub curves_path: Option<PathBuf>,
    pub curve_count: usize,
}

pub fn run_plot<W: Write>(settings: &Settings, out: &mut W) -> Result<RunOutput, AppError> {
    settings.validate()?;

    let table = load_table(&settings.input_path)?;
    let load_diagnostics = format_load_diagnostics(&table);
    emit(out, &load_diagnostics)?;

    let observations = table.to_observations()?;
    info!(
        rows = observations.len(),
        input = %settings.input_path.display(),
        "observations loaded"
    );
    let overview = format_dataset_overview(&observations);
    emit(out, &overview)?;

    let figure = build_figure(&observations, &settings.smooth);
    let summary = summarize(&observations);
    let report = format_summary(&summary);
    emit(out, &report)?;

    write_figure_png(&figure, &settings.output_path, settings)?;

    if let Some(path) = &settings.export_curves {
        write_curves_json(path, &figure, &settings.smooth)?;
        info!(path = %path.display(), "curves exported");
    }

    let curve_count = figure.curve_count();
    drop(figure);

    Ok(RunOutput {
        load_diagnostics,
        overview,
        summary,
        report,
        output_path: settings.output_path.clone(),
        curves_path: settings.export_curves.clone(),
        curve_count,
    })
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}")
        .and_then(|()| out.flush())
        .map_err(|e| AppError::output(format!("Failed to write report: {e}")))
}
