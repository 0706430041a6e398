//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{LineFit, Sample, SampleResidual};
use crate::error::AppError;

/// Compute fitted values and residuals for each sample.
pub fn compute_residuals(samples: &[Sample], fit: &LineFit) -> Result<Vec<SampleResidual>, AppError> {
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        let y_fit = fit.predict(s.x);
        if !y_fit.is_finite() {
            return Err(AppError::new(
                4,
                "Non-finite model prediction during residual computation.",
            ));
        }
        out.push(SampleResidual {
            sample: s.clone(),
            y_fit,
            residual: s.y - y_fit,
        });
    }
    Ok(out)
}
