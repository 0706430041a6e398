//! Goodness-of-fit statistics.
//!
//! Chi-squared here is the sum of squared, uncertainty-normalized residuals:
//!
//! ```text
//! χ² = Σ (r_i / σ_i)²
//! ```
//!
//! Dividing by the degrees of freedom (`n - 2` for a two-parameter line)
//! gives the reduced chi-squared. Values near 1 indicate residuals consistent
//! with the stated uncertainties; rescaling every σ by a factor `k` rescales
//! the statistic by `1/k²`.

/// Number of parameters fitted by the line model.
pub const N_PARAMS: usize = 2;

/// Sum of squared, sigma-normalized residuals.
///
/// # Panics
/// Panics in debug builds if the slices differ in length.
pub fn chi_squared(residuals: &[f64], sigmas: &[f64]) -> f64 {
    debug_assert_eq!(residuals.len(), sigmas.len());
    residuals
        .iter()
        .zip(sigmas)
        .map(|(r, sigma)| (r / sigma).powi(2))
        .sum()
}

/// Reduced chi-squared, or `None` when there are no free degrees of freedom.
pub fn reduced_chi_squared(residuals: &[f64], sigmas: &[f64]) -> Option<f64> {
    let dof = residuals.len().checked_sub(N_PARAMS)?;
    if dof == 0 {
        return None;
    }
    Some(chi_squared(residuals, sigmas) / dof as f64)
}

/// Root mean squared residual.
pub fn rmse(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    let ss: f64 = residuals.iter().map(|r| r * r).sum();
    (ss / residuals.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chi_squared_closed_form() {
        // (1/0.5)² + (2/1)² + (1/2)² = 4 + 4 + 0.25
        let r = [1.0, -2.0, 1.0];
        let s = [0.5, 1.0, 2.0];
        assert!((chi_squared(&r, &s) - 8.25).abs() < 1e-12);
        assert!((reduced_chi_squared(&r, &s).unwrap() - 8.25).abs() < 1e-12);
    }

    #[test]
    fn perfect_fit_has_zero_reduced_chi_squared() {
        let r = [0.0; 5];
        let s = [0.7; 5];
        assert_eq!(reduced_chi_squared(&r, &s), Some(0.0));
    }

    #[test]
    fn sigma_rescaling_scales_as_inverse_square() {
        // Same residuals, all sigmas scaled by k: χ²_red must scale by 1/k².
        let r = [0.3, -0.8, 0.5, 0.2, -0.4];
        let s = [0.4, 0.9, 0.6, 1.1, 0.5];
        let k = 3.0;
        let scaled: Vec<f64> = s.iter().map(|v| v * k).collect();

        let base = reduced_chi_squared(&r, &s).unwrap();
        let rescaled = reduced_chi_squared(&r, &scaled).unwrap();
        assert!((rescaled - base / (k * k)).abs() < 1e-12);
    }

    #[test]
    fn too_few_points_yield_no_statistic() {
        assert_eq!(reduced_chi_squared(&[0.1, 0.2], &[1.0, 1.0]), None);
    }
}
