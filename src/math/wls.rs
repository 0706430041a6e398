//! Weighted least squares solver.
//!
//! We solve one small linear regression problem of the form:
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - Rows are scaled by `sqrt(w_i)` upstream, so this module only ever sees an
//!   ordinary least squares problem.
//! - SVD solves the least-squares problem robustly even though the design
//!   matrix is tall (many rows, two columns). (Nalgebra's `QR::solve` is
//!   intended for square systems and will panic for non-square matrices.)
//! - The parameter covariance comes from the inverse of the normal matrix
//!   `XᵀX` of the (already weighted) design. With `1/σ²` weights this is the
//!   absolute covariance `(XᵀWX)⁻¹`; for unweighted fits the caller rescales
//!   it by the residual variance.

use nalgebra::{DMatrix, DVector, Matrix2};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails. Degenerate
    // data (e.g. all x equal) still fails every rung and reports as singular.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Inverse of the 2×2 normal matrix `XᵀX` of a (weighted) design matrix.
///
/// Returns `None` when the normal matrix is singular or the inverse is not
/// finite (e.g. a design with a constant x column).
pub fn normal_matrix_inverse(x: &DMatrix<f64>) -> Option<Matrix2<f64>> {
    let xtx = x.transpose() * x;
    if xtx.nrows() != 2 || xtx.ncols() != 2 {
        return None;
    }
    let m = Matrix2::new(xtx[(0, 0)], xtx[(0, 1)], xtx[(1, 0)], xtx[(1, 1)]);
    let inv = m.try_inverse()?;
    if inv.iter().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}
