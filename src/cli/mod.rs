//! Command-line parsing for the line fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::WeightMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "linfit",
    version,
    about = "Fit a straight line to delimited data, with optional per-point uncertainties"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a line to a data file, print the parameters, and optionally plot/export.
    Fit(FitArgs),
    /// Generate a synthetic practice dataset from a known line.
    Synth(SynthArgs),
    /// Replot a previously exported fit JSON.
    Plot(PlotArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input file: 2 columns (x,y) or 3 columns (x,y,σy), no header.
    pub input: PathBuf,

    /// Field delimiter.
    #[arg(short = 'd', long, default_value_t = ',')]
    pub delimiter: char,

    /// How to weight observations.
    #[arg(short = 'w', long = "weights", value_enum, default_value_t = WeightMode::Auto)]
    pub weights: WeightMode,

    /// Plot title.
    #[arg(long, default_value = "Plot of data with fit")]
    pub title: String,

    /// X axis label.
    #[arg(long, default_value = "x")]
    pub xlabel: String,

    /// Y axis label.
    #[arg(long, default_value = "y")]
    pub ylabel: String,

    /// Write a PNG plot of the data and fitted line.
    #[arg(short = 'o', long, value_name = "PNG")]
    pub out: Option<PathBuf>,

    /// Plot style JSON (appearance only; missing fields use defaults).
    #[arg(long, value_name = "JSON")]
    pub style: Option<PathBuf>,

    /// Export per-sample results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fit (parameters + diagnostics + fitted grid) to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Output data file.
    pub out: PathBuf,

    /// Number of samples to generate.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Minimum x value.
    #[arg(long, default_value_t = 0.5)]
    pub x_min: f64,

    /// Maximum x value.
    #[arg(long, default_value_t = 10.0)]
    pub x_max: f64,

    /// True intercept of the generating line.
    #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
    pub intercept: f64,

    /// True slope of the generating line.
    #[arg(long, default_value_t = 0.65, allow_hyphen_values = true)]
    pub slope: f64,

    /// Minimum per-point σ.
    #[arg(long, default_value_t = 0.25)]
    pub sigma_min: f64,

    /// Maximum per-point σ.
    #[arg(long, default_value_t = 1.0)]
    pub sigma_max: f64,

    /// Omit the σy column (two-column output).
    #[arg(long)]
    pub no_errors: bool,

    /// Random seed for noise generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Field delimiter.
    #[arg(short = 'd', long, default_value_t = ',')]
    pub delimiter: char,
}

/// Options for replotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `linfit fit --export-fit`.
    pub fit: PathBuf,

    /// Output PNG path.
    #[arg(short = 'o', long, value_name = "PNG")]
    pub out: PathBuf,

    /// Plot style JSON.
    #[arg(long, value_name = "JSON")]
    pub style: Option<PathBuf>,

    /// Plot title.
    #[arg(long, default_value = "Fitted line")]
    pub title: String,

    /// X axis label.
    #[arg(long, default_value = "x")]
    pub xlabel: String,

    /// Y axis label.
    #[arg(long, default_value = "y")]
    pub ylabel: String,
}
