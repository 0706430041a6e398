//! Low-level fitting routine for the straight line `y = intercept + slope·x`.
//!
//! Given samples `(x_i, y_i)` with optional uncertainties `σ_i`, we solve a
//! weighted least-squares problem on the design matrix `[1, x]` and derive:
//!
//! - the fitted intercept and slope
//! - their 2×2 covariance matrix
//! - goodness-of-fit diagnostics (chi-squared for weighted fits, RMSE always)
//!
//! Covariance conventions:
//! - weighted fits treat the stated sigmas as absolute: `cov = (XᵀWX)⁻¹`
//! - unweighted fits rescale the normal-matrix inverse by the residual
//!   variance: `cov = (XᵀX)⁻¹ · SSE / (n - 2)`

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, LineFit, Sample, WeightMode};
use crate::error::AppError;
use crate::fit::goodness::{self, N_PARAMS};
use crate::math::{normal_matrix_inverse, solve_least_squares};

/// A completed fit: parameters, diagnostics, and the weighting actually used.
#[derive(Debug, Clone)]
pub struct FittedLine {
    pub fit: LineFit,
    pub quality: FitQuality,
    /// Whether `1/σ²` weights were applied (resolves `WeightMode::Auto`).
    pub weighted: bool,
}

/// Fit a straight line to the samples under the given weight mode.
pub fn fit_line(samples: &[Sample], mode: WeightMode) -> Result<FittedLine, AppError> {
    let n = samples.len();
    if n <= N_PARAMS {
        return Err(AppError::new(
            3,
            format!("Need at least {} samples to fit a line, got {n}.", N_PARAMS + 1),
        ));
    }
    for s in samples {
        if !(s.x.is_finite() && s.y.is_finite()) {
            return Err(AppError::new(3, "Non-finite sample values in dataset."));
        }
    }

    let sigmas = resolve_sigmas(samples, mode)?;

    // Build the sqrt-weight scaled design matrix and observation vector.
    let mut xw = DMatrix::<f64>::zeros(n, N_PARAMS);
    let mut yw = DVector::<f64>::zeros(n);
    for (i, s) in samples.iter().enumerate() {
        let sw = match &sigmas {
            Some(sig) => (1.0 / (sig[i] * sig[i])).sqrt(),
            None => 1.0,
        };
        xw[(i, 0)] = sw;
        xw[(i, 1)] = s.x * sw;
        yw[i] = s.y * sw;
    }

    let beta = solve_least_squares(&xw, &yw)
        .ok_or_else(|| AppError::new(4, "Least-squares system is singular (is x constant?)."))?;
    let ninv = normal_matrix_inverse(&xw)
        .ok_or_else(|| AppError::new(4, "Normal matrix is singular (is x constant?)."))?;

    let intercept = beta[0];
    let slope = beta[1];

    let residuals: Vec<f64> = samples
        .iter()
        .map(|s| s.y - (intercept + slope * s.x))
        .collect();
    let dof = n - N_PARAMS;

    let (covariance, chi2, chi2_red) = match &sigmas {
        Some(sig) => {
            // Absolute-sigma convention: the covariance is (XᵀWX)⁻¹ as-is.
            let chi2 = goodness::chi_squared(&residuals, sig);
            let cov = [[ninv[(0, 0)], ninv[(0, 1)]], [ninv[(1, 0)], ninv[(1, 1)]]];
            (cov, Some(chi2), Some(chi2 / dof as f64))
        }
        None => {
            // Residual-variance scaling: estimate the (unknown, uniform) noise
            // level from the scatter about the fit.
            let sse: f64 = residuals.iter().map(|r| r * r).sum();
            let s2 = sse / dof as f64;
            let cov = [
                [ninv[(0, 0)] * s2, ninv[(0, 1)] * s2],
                [ninv[(1, 0)] * s2, ninv[(1, 1)] * s2],
            ];
            (cov, None, None)
        }
    };

    if !(intercept.is_finite()
        && slope.is_finite()
        && covariance.iter().flatten().all(|v| v.is_finite()))
    {
        return Err(AppError::new(4, "Fit produced non-finite parameters."));
    }

    let quality = FitQuality {
        n,
        dof,
        chi2,
        chi2_red,
        rmse: goodness::rmse(&residuals),
    };

    Ok(FittedLine {
        fit: LineFit {
            intercept,
            slope,
            covariance,
        },
        quality,
        weighted: sigmas.is_some(),
    })
}

/// Resolve the per-sample sigmas implied by the weight mode.
///
/// Returns `None` for an unweighted fit. `Auto` weights only when every
/// sample carries an uncertainty; `Sigma` demands it.
fn resolve_sigmas(samples: &[Sample], mode: WeightMode) -> Result<Option<Vec<f64>>, AppError> {
    let collect = || -> Option<Vec<f64>> { samples.iter().map(|s| s.sigma_y).collect() };

    let sigmas = match mode {
        WeightMode::None => None,
        WeightMode::Auto => collect(),
        WeightMode::Sigma => Some(collect().ok_or_else(|| {
            AppError::new(
                2,
                "`--weights sigma` requires a three-column input file with uncertainties.",
            )
        })?),
    };

    if let Some(sig) = &sigmas {
        for &s in sig {
            if !s.is_finite() || s <= 0.0 {
                return Err(AppError::new(3, "Invalid σ value (must be finite and > 0)."));
            }
        }
    }
    Ok(sigmas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(xy: &[(f64, f64)]) -> Vec<Sample> {
        xy.iter()
            .map(|&(x, y)| Sample {
                x,
                y,
                sigma_y: None,
            })
            .collect()
    }

    fn samples_with_sigma(xys: &[(f64, f64, f64)]) -> Vec<Sample> {
        xys.iter()
            .map(|&(x, y, s)| Sample {
                x,
                y,
                sigma_y: Some(s),
            })
            .collect()
    }

    #[test]
    fn perfect_line_is_recovered_exactly() {
        let data = samples_with_sigma(&[
            (0.0, 2.0, 0.5),
            (1.0, 5.0, 0.5),
            (2.0, 8.0, 0.5),
            (3.0, 11.0, 0.5),
        ]);
        let out = fit_line(&data, WeightMode::Auto).unwrap();
        assert!((out.fit.intercept - 2.0).abs() < 1e-10);
        assert!((out.fit.slope - 3.0).abs() < 1e-10);
        // Zero residuals: reduced chi-squared is exactly 0.
        assert!(out.quality.chi2_red.unwrap() < 1e-20);
    }

    #[test]
    fn unweighted_covariance_uses_residual_variance() {
        // x symmetric about 0 and residuals e = (δ, -2δ, δ) orthogonal to the
        // design, so the fit is exact and SSE = 6δ². With dof = 1:
        //   var(intercept) = 6δ²/3 = 2δ², var(slope) = 6δ²/2 = 3δ².
        let d = 0.1;
        let data = samples(&[(-1.0, 1.0 - 2.0 + d), (0.0, 1.0 - 2.0 * d), (1.0, 3.0 + d)]);
        let out = fit_line(&data, WeightMode::Auto).unwrap();

        assert!((out.fit.intercept - 1.0).abs() < 1e-10);
        assert!((out.fit.slope - 2.0).abs() < 1e-10);
        assert!(!out.weighted);
        assert!((out.fit.intercept_err() - (2.0 * d * d).sqrt()).abs() < 1e-10);
        assert!((out.fit.slope_err() - (3.0 * d * d).sqrt()).abs() < 1e-10);
        assert_eq!(out.quality.chi2, None);
    }

    #[test]
    fn weighted_covariance_is_absolute() {
        // Unit sigmas: cov = (XᵀX)⁻¹ independent of the residual size.
        let d = 0.4;
        let data = samples_with_sigma(&[
            (-1.0, -1.0 + d, 1.0),
            (0.0, 1.0 - 2.0 * d, 1.0),
            (1.0, 3.0 + d, 1.0),
        ]);
        let out = fit_line(&data, WeightMode::Auto).unwrap();

        assert!(out.weighted);
        assert!((out.fit.intercept_err() - (1.0f64 / 3.0).sqrt()).abs() < 1e-10);
        assert!((out.fit.slope_err() - 0.5f64.sqrt()).abs() < 1e-10);
        // χ² = 6δ², dof = 1.
        assert!((out.quality.chi2_red.unwrap() - 6.0 * d * d).abs() < 1e-10);
    }

    #[test]
    fn uniform_sigma_rescaling_moves_chi2_not_parameters() {
        let base = samples_with_sigma(&[
            (0.5, -2.1, 0.5),
            (1.5, -1.2, 0.8),
            (3.0, -0.4, 0.4),
            (5.0, 1.1, 0.6),
            (7.0, 2.3, 0.9),
        ]);
        let k = 2.5;
        let scaled: Vec<Sample> = base
            .iter()
            .map(|s| Sample {
                sigma_y: s.sigma_y.map(|v| v * k),
                ..s.clone()
            })
            .collect();

        let a = fit_line(&base, WeightMode::Sigma).unwrap();
        let b = fit_line(&scaled, WeightMode::Sigma).unwrap();

        // Uniform weight rescaling leaves the minimizer unchanged.
        assert!((a.fit.intercept - b.fit.intercept).abs() < 1e-9);
        assert!((a.fit.slope - b.fit.slope).abs() < 1e-9);
        // But the statistic scales as 1/k² and the errors as k.
        assert!((b.quality.chi2_red.unwrap() - a.quality.chi2_red.unwrap() / (k * k)).abs() < 1e-9);
        assert!((b.fit.slope_err() - a.fit.slope_err() * k).abs() < 1e-9);
    }

    #[test]
    fn low_sigma_points_dominate_weighted_fit() {
        // First three points lie exactly on y = x; the fourth is a gross
        // outlier with a huge stated uncertainty.
        let data = samples_with_sigma(&[
            (0.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (2.0, 2.0, 1.0),
            (3.0, 10.0, 100.0),
        ]);
        let weighted = fit_line(&data, WeightMode::Auto).unwrap();
        let unweighted = fit_line(&data, WeightMode::None).unwrap();

        assert!((weighted.fit.slope - 1.0).abs() < 0.05);
        assert!(unweighted.fit.slope > 1.5);
    }

    #[test]
    fn sigma_mode_requires_uncertainty_column() {
        let data = samples(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let err = fit_line(&data, WeightMode::Sigma).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_few_samples_is_a_dataset_error() {
        let data = samples(&[(0.0, 1.0), (1.0, 2.0)]);
        let err = fit_line(&data, WeightMode::Auto).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn constant_x_is_a_numerical_error() {
        let data = samples(&[(2.0, 1.0), (2.0, 2.0), (2.0, 3.0)]);
        let err = fit_line(&data, WeightMode::Auto).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
