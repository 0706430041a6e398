//! Straight-line fitting.
//!
//! Responsibilities:
//!
//! - build the `[1, x]` design matrix and resolve observation weights
//! - solve the weighted least-squares problem and derive the covariance
//! - compute goodness-of-fit diagnostics (chi-squared, RMSE)

pub mod goodness;
pub mod line;

pub use goodness::*;
pub use line::*;
