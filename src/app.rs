//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fit pipeline (ingest -> fit -> residuals)
//! - prints reports
//! - writes optional plots/exports

use clap::Parser;
use log::{info, warn};

use crate::cli::{Command, FitArgs, PlotArgs, SynthArgs};
use crate::data::SynthConfig;
use crate::domain::FitConfig;
use crate::error::AppError;
use crate::plot::{PlotLabels, PlotStyle};

pub mod pipeline;

/// Entry point for the `linfit` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // We want `linfit data.csv` to behave like `linfit fit data.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // keeping the common case short to type.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Synth(args) => handle_synth(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    for e in &run.ingest.row_errors {
        warn!("{}:{}: {}", config.input.display(), e.line, e.message);
    }

    println!(
        "{}",
        crate::report::format_fit_summary(&run.ingest, &run.fit, &run.quality, run.weighted, &config)
    );

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
        info!("wrote results CSV to {}", path.display());
    }
    if let Some(path) = &config.export_fit {
        crate::io::fitfile::write_fit_json(
            path,
            &run.fit,
            &run.quality,
            run.weighted,
            &run.ingest,
            &config.input.display().to_string(),
        )?;
        info!("wrote fit JSON to {}", path.display());
    }

    if let Some(path) = &config.plot_out {
        let style = load_style(config.style_path.as_deref())?;
        let (xs, ys) = crate::io::fitfile::build_grid(
            &run.fit,
            run.ingest.stats.x_min,
            run.ingest.stats.x_max,
            101,
        );
        let curve: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
        let labels = PlotLabels {
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
        };
        crate::plot::render_fit_png(path, &run.ingest.samples, &curve, &style, &labels)?;
        println!("Saved plot to {}", path.display());
    }

    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let delimiter = parse_delimiter(args.delimiter)?;
    let config = SynthConfig {
        count: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        intercept: args.intercept,
        slope: args.slope,
        sigma_min: args.sigma_min,
        sigma_max: args.sigma_max,
        with_sigma: !args.no_errors,
        seed: args.seed,
    };

    let samples = crate::data::generate_samples(&config)?;
    crate::data::write_samples(&args.out, &samples, delimiter)?;

    println!(
        "Wrote {} samples to {} (y = {} + {}·x, σ ∈ [{}, {}]{})",
        samples.len(),
        args.out.display(),
        config.intercept,
        config.slope,
        config.sigma_min,
        config.sigma_max,
        if config.with_sigma { "" } else { ", column omitted" }
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let fit_file = crate::io::fitfile::read_fit_json(&args.fit)?;
    let style = load_style(args.style.as_deref())?;

    // Replot from the precomputed grid only; samples are not stored in fit files.
    let curve: Vec<(f64, f64)> = fit_file
        .grid
        .x
        .iter()
        .copied()
        .zip(fit_file.grid.y.iter().copied())
        .collect();
    let labels = PlotLabels {
        title: args.title,
        x_label: args.xlabel,
        y_label: args.ylabel,
    };
    crate::plot::render_fit_png(&args.out, &[], &curve, &style, &labels)?;

    println!("Saved plot to {}", args.out.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    Ok(FitConfig {
        input: args.input.clone(),
        delimiter: parse_delimiter(args.delimiter)?,
        weight_mode: args.weights,
        title: args.title.clone(),
        x_label: args.xlabel.clone(),
        y_label: args.ylabel.clone(),
        plot_out: args.out.clone(),
        style_path: args.style.clone(),
        export_results: args.export.clone(),
        export_fit: args.export_fit.clone(),
    })
}

fn parse_delimiter(c: char) -> Result<u8, AppError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(AppError::new(2, format!("Delimiter '{c}' must be a single ASCII character.")))
    }
}

fn load_style(path: Option<&std::path::Path>) -> Result<PlotStyle, AppError> {
    match path {
        Some(p) => PlotStyle::from_path(p),
        None => Ok(PlotStyle::default()),
    }
}

/// Rewrite argv so `linfit FILE` defaults to `linfit fit FILE`.
///
/// Rules:
/// - `linfit`                      -> unchanged (top-level help)
/// - `linfit data.csv ...`         -> `linfit fit data.csv ...`
/// - `linfit -w sigma data.csv`    -> `linfit fit -w sigma data.csv`
/// - `linfit fit/synth/plot ...`   -> unchanged
/// - `linfit --help/--version/-h`  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "synth" | "plot");
    if is_subcommand {
        return argv;
    }

    // A flag or a data file: treat the whole tail as `fit` arguments.
    argv.insert(1, "fit".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_is_unchanged() {
        assert_eq!(rewrite_args(argv(&["linfit"])), argv(&["linfit"]));
        assert_eq!(rewrite_args(argv(&["linfit", "--help"])), argv(&["linfit", "--help"]));
    }

    #[test]
    fn data_file_defaults_to_fit() {
        assert_eq!(
            rewrite_args(argv(&["linfit", "data.csv"])),
            argv(&["linfit", "fit", "data.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["linfit", "-w", "sigma", "data.csv"])),
            argv(&["linfit", "fit", "-w", "sigma", "data.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_are_untouched() {
        assert_eq!(
            rewrite_args(argv(&["linfit", "synth", "out.csv"])),
            argv(&["linfit", "synth", "out.csv"])
        );
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        assert_eq!(parse_delimiter(';').unwrap(), b';');
        assert_eq!(parse_delimiter('λ').unwrap_err().exit_code(), 2);
    }
}
