//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - parses CLI arguments
//! - initialises logging
//! - layers settings (defaults, environment, flags)
//! - runs the plot pipeline or the sample generator
//! - prints reports

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, PlotArgs, SampleArgs};
use crate::data::{SampleConfig, generate_table};
use crate::domain::{EnvOverrides, Settings, default_input_path};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `netsim-viz` binary.
pub fn run() -> Result<(), AppError> {
    // A bare `netsim-viz` (or flags only) runs `plot`; clap needs the
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    init_logging(args.verbose);
    let env = EnvOverrides::from_env()?;
    let settings = settings_from_args(&args, env);

    let run = pipeline::run_plot(&settings, &mut std::io::stdout().lock())?;

    if let Some(path) = &run.curves_path {
        println!("Curves: {}", path.display());
    }
    println!("Saved: {}", run.output_path.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    init_logging(args.verbose);
    let env = EnvOverrides::from_env()?;

    let root = args
        .root
        .clone()
        .or(env.project_root)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = args.output.clone().unwrap_or_else(|| default_input_path(&root));

    let config = SampleConfig {
        seed: args.seed,
        noise: args.noise,
        lambda_start: args.lambda_start,
        lambda_end: args.lambda_end,
        lambda_step: args.lambda_step,
        ..SampleConfig::default()
    };
    let table = generate_table(&config)?;
    crate::io::write_observations_csv(&path, &table)?;

    info!(rows = table.len(), seed = config.seed, "sample table generated");
    println!("Saved: {}", path.display());
    Ok(())
}

/// Resolve run settings: flags win over environment, environment over defaults.
pub fn settings_from_args(args: &PlotArgs, env: EnvOverrides) -> Settings {
    let root = args
        .root
        .clone()
        .or(env.project_root)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut settings = Settings::for_root(root);
    if let Some(input) = &args.input {
        settings.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        settings.output_path = output.clone();
    }
    if let Some(dpi) = args.dpi.or(env.dpi) {
        settings.dpi = dpi;
    }
    if let Some(resolution) = args.resolution.or(env.resolution) {
        settings.smooth.resolution = resolution;
    }
    settings.export_curves = args.export_curves.clone();
    settings.font_path = args.font.clone().or(env.font_path);
    settings
}

/// Rewrite argv so `netsim-viz` defaults to `netsim-viz plot`.
///
/// Rules:
/// - `netsim-viz`                     -> `netsim-viz plot`
/// - `netsim-viz --dpi 150 ...`       -> `netsim-viz plot --dpi 150 ...`
/// - `netsim-viz --help/--version/-h` -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("plot".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "plot" | "sample") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "plot".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_plot() {
        assert_eq!(rewrite_args(argv(&["netsim-viz"])), argv(&["netsim-viz", "plot"]));
        assert_eq!(
            rewrite_args(argv(&["netsim-viz", "--dpi", "72"])),
            argv(&["netsim-viz", "plot", "--dpi", "72"])
        );
        assert_eq!(rewrite_args(argv(&["netsim-viz", "--help"])), argv(&["netsim-viz", "--help"]));
        assert_eq!(rewrite_args(argv(&["netsim-viz", "sample"])), argv(&["netsim-viz", "sample"]));
    }

    #[test]
    fn flags_override_environment() {
        let env = EnvOverrides {
            project_root: Some(PathBuf::from("/env/root")),
            dpi: Some(150),
            resolution: Some(400),
            font_path: None,
        };
        let args = PlotArgs {
            dpi: Some(72),
            ..PlotArgs::default()
        };
        let s = settings_from_args(&args, env);
        assert_eq!(s.dpi, 72);
        assert_eq!(s.smooth.resolution, 400);
        assert_eq!(s.input_path, PathBuf::from("/env/root/public/analysis_with_methods.csv"));
    }

    #[test]
    fn no_flags_no_env_uses_fixed_layout() {
        let s = settings_from_args(&PlotArgs::default(), EnvOverrides::default());
        assert_eq!(s.input_path, PathBuf::from("./public/analysis_with_methods.csv"));
        assert_eq!(s.output_path, PathBuf::from("./public/simulation_plots.png"));
        assert_eq!(s.dpi, 300);
    }

    #[test]
    fn cli_parses_plot_flags() {
        let cli = crate::cli::Cli::parse_from(argv(&["netsim-viz", "plot", "--root", "/p", "--resolution", "50"]));
        match cli.command {
            Command::Plot(args) => {
                assert_eq!(args.root, Some(PathBuf::from("/p")));
                assert_eq!(args.resolution, Some(50));
            }
            Command::Sample(_) => panic!("expected plot"),
        }
    }
}
