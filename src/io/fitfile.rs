//! Read/write fit JSON files.
//!
//! Fit JSON is the "portable" representation of a completed fit:
//! - intercept + slope + covariance matrix
//! - goodness-of-fit diagnostics
//! - a precomputed fitted grid for quick replotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitFile, FitGrid, FitQuality, LineFit};
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// Number of grid points written to fit files (dense enough for any DPI).
const GRID_POINTS: usize = 101;

/// Write a fit JSON file.
pub fn write_fit_json(
    path: &Path,
    fit: &LineFit,
    quality: &FitQuality,
    weighted: bool,
    ingest: &IngestedData,
    input_name: &str,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create fit JSON '{}'", path.display()), e)
    })?;

    let (x, y) = build_grid(fit, ingest.stats.x_min, ingest.stats.x_max, GRID_POINTS);
    let out = FitFile {
        tool: "linfit".to_string(),
        input: input_name.to_string(),
        weighted,
        fit: fit.clone(),
        quality: quality.clone(),
        grid: FitGrid { x, y },
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open fit JSON '{}'", path.display()), e))?;
    let fit: FitFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

/// Evaluate the fitted line on an evenly spaced grid over `[x_min, x_max]`.
pub fn build_grid(fit: &LineFit, x_min: f64, x_max: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }

    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x0 + u * (x1 - x0);
        xs.push(x);
        ys.push(fit.predict(x));
    }
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_the_requested_range() {
        let fit = LineFit {
            intercept: 1.0,
            slope: 2.0,
            covariance: [[0.0; 2]; 2],
        };
        let (x, y) = build_grid(&fit, 0.5, 10.0, 101);

        assert_eq!(x.len(), 101);
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!((x[100] - 10.0).abs() < 1e-12);
        assert!((y[100] - 21.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_falls_back_to_unit_interval() {
        let fit = LineFit {
            intercept: 0.0,
            slope: 1.0,
            covariance: [[0.0; 2]; 2],
        };
        let (x, _) = build_grid(&fit, 3.0, 3.0, 11);
        assert!((x[0] - 0.0).abs() < 1e-12);
        assert!((x[10] - 1.0).abs() < 1e-12);
    }
}
