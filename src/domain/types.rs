//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for replotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How observations are weighted in the fit objective.
///
/// With per-point uncertainties `σ_i`, minimizing `Σ (r_i / σ_i)²` means
/// weighting squared residuals by `1/σ_i²`. The weighted covariance is taken
/// as absolute (`(XᵀWX)⁻¹`, no residual rescaling), so the reported parameter
/// uncertainties are meaningful in the units of the stated `σ_i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// Use `1/σ²` weights when the file has an uncertainty column, uniform otherwise.
    Auto,
    /// Uniform weights even if an uncertainty column exists.
    None,
    /// Require the uncertainty column and weight by `1/σ²`.
    Sigma,
}

/// One observation read from the input file.
///
/// Order is file order and carries no meaning for the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    /// Per-point 1σ uncertainty on `y`, when the file has a third column.
    pub sigma_y: Option<f64>,
}

/// Summary stats about the samples actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_samples: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Largest uncertainty (for plot bounds); `None` for two-column data.
    pub sigma_max: Option<f64>,
}

/// Fitted straight-line parameters and their covariance.
///
/// The covariance matrix is indexed `[intercept, slope]` on both axes.
/// Parameter uncertainties are derived from the diagonal, never stored
/// separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
    pub covariance: [[f64; 2]; 2],
}

impl LineFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// 1σ uncertainty on the intercept.
    pub fn intercept_err(&self) -> f64 {
        self.covariance[0][0].sqrt()
    }

    /// 1σ uncertainty on the slope.
    pub fn slope_err(&self) -> f64 {
        self.covariance[1][1].sqrt()
    }
}

/// Goodness-of-fit diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    /// `n - 2` (two fitted parameters).
    pub dof: usize,
    /// Sum of squared, uncertainty-normalized residuals (weighted fits only).
    pub chi2: Option<f64>,
    /// `chi2 / dof`. A value near 1 indicates residuals consistent with the
    /// stated uncertainties.
    pub chi2_red: Option<f64>,
    pub rmse: f64,
}

/// A per-sample fitted result (used for exports and plotting).
#[derive(Debug, Clone)]
pub struct SampleResidual {
    pub sample: Sample,
    pub y_fit: f64,
    pub residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub delimiter: u8,
    pub weight_mode: WeightMode,

    pub title: String,
    pub x_label: String,
    pub y_label: String,

    pub plot_out: Option<PathBuf>,
    pub style_path: Option<PathBuf>,

    pub export_results: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
}

/// A saved fit file (JSON).
///
/// Portable representation of a completed fit: parameters + covariance, the
/// diagnostics, and a precomputed fitted grid for quick replotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub input: String,
    pub weighted: bool,
    pub fit: LineFit,
    pub quality: FitQuality,
    pub grid: FitGrid,
}

/// The fitted line evaluated over the data range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
