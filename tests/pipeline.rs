use std::fs;
use std::path::Path;

use netsim_viz::app::pipeline::run_plot;
use netsim_viz::data::{SampleConfig, generate_table};
use netsim_viz::domain::{NetworkType, Settings};
use netsim_viz::error::{EXIT_INPUT, EXIT_OUTPUT, EXIT_SCHEMA, EXIT_SETTINGS};
use netsim_viz::io::write_observations_csv;

fn low_res_settings(root: &Path) -> Settings {
    let mut settings = Settings::for_root(root);
    settings.dpi = 36;
    settings
}

fn write_sample(settings: &Settings) {
    let table = generate_table(&SampleConfig::default()).unwrap();
    write_observations_csv(&settings.input_path, &table).unwrap();
}

fn write_csv_without_gordon_newell(settings: &Settings) {
    fs::create_dir_all(settings.input_path.parent().unwrap()).unwrap();
    fs::write(
        &settings.input_path,
        "NetworkType,Lambda,MeanValueAnalysis,GlobalBalanceMethod,BuzenMethod,MeanValueDelay\n\
         AdHoc,0.1,0.1,0.1,0.1,0.01\n",
    )
    .unwrap();
}

fn png_size(path: &Path) -> (u32, u32) {
    let bytes = fs::read(path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let be = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    (be(16), be(20))
}

#[test]
fn full_run_writes_figure_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let settings = low_res_settings(dir.path());
    write_sample(&settings);

    let mut out = Vec::new();
    let run = run_plot(&settings, &mut out).unwrap();

    assert_eq!(run.output_path, dir.path().join("public").join("simulation_plots.png"));
    // 18x14 in at 36 dpi, cropped to the drawn content.
    let (w, h) = png_size(&run.output_path);
    assert!(w <= 648 && w > 600, "width {w}");
    assert!(h <= 504 && h > 450, "height {h}");
    assert_eq!(run.curve_count, 10);

    assert!(run.load_diagnostics.starts_with("Loaded: analysis_with_methods.csv"));
    assert!(run.load_diagnostics.contains("Rows: 40, Columns: 7"));
    assert!(run.overview.contains("Network types: [AdHoc, Group]"));
    assert!(run.overview.contains("Lambda range: 0.1 - 2"));
    assert!(run.report.contains("AdHoc network:"));
    assert!(run.report.contains("Group network:"));
    assert!(!run.report.contains("NO DATA"));

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed, format!("{}\n{}\n{}\n", run.load_diagnostics, run.overview, run.report));
}

#[test]
fn curves_can_be_exported_alongside_the_figure() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = low_res_settings(dir.path());
    settings.export_curves = Some(dir.path().join("curves.json"));
    write_sample(&settings);

    run_plot(&settings, &mut Vec::new()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.path().join("curves.json")).unwrap()).unwrap();
    let curves = json["curves"].as_array().unwrap();
    assert_eq!(curves.len(), 10);
    assert!(curves.iter().all(|c| c["interpolation"] == "cubic"));
}

#[test]
fn missing_category_is_reported_as_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let settings = low_res_settings(dir.path());
    let full = generate_table(&SampleConfig::default()).unwrap();
    write_observations_csv(&settings.input_path, &full.subset(NetworkType::AdHoc)).unwrap();

    let run = run_plot(&settings, &mut Vec::new()).unwrap();

    assert_eq!(run.curve_count, 5);
    assert!(run.report.contains("Group network: NO DATA"));
    assert!(settings.output_path.exists());
}

#[test]
fn missing_column_fails_without_writing_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let settings = low_res_settings(dir.path());
    write_csv_without_gordon_newell(&settings);

    let mut out = Vec::new();
    let err = run_plot(&settings, &mut out).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_SCHEMA);
    assert!(err.message().contains("GordonNewellMethod"));
    assert!(!settings.output_path.exists());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("Loaded: analysis_with_methods.csv\n  Rows: 1, Columns: 6"));
}

#[test]
fn statistics_are_printed_even_when_the_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = low_res_settings(dir.path());
    settings.font_path = Some(dir.path().join("nofont.ttf"));
    settings.export_curves = Some(dir.path().join("curves.json"));
    write_sample(&settings);

    let mut out = Vec::new();
    let err = run_plot(&settings, &mut out).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_OUTPUT);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Rows: 40, Columns: 7"));
    assert!(printed.contains("ANALYSIS METHOD STATISTICS"));
    assert!(printed.contains("Group network:"));
    assert!(!settings.output_path.exists());
    assert!(!dir.path().join("curves.json").exists());
}

#[test]
fn oversized_resolution_is_a_settings_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = low_res_settings(dir.path());
    settings.dpi = 4_000_000_000;
    write_sample(&settings);

    let err = run_plot(&settings, &mut Vec::new()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_SETTINGS);
    assert!(!settings.output_path.exists());
}

#[test]
fn missing_input_reports_the_attempted_path() {
    let dir = tempfile::tempdir().unwrap();
    let settings = low_res_settings(dir.path());

    let err = run_plot(&settings, &mut Vec::new()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.message().contains(&settings.input_path.display().to_string()));
    assert!(!settings.output_path.exists());
}
