//! Export per-sample results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts, so unlike the input files it carries a header row.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::SampleResidual;
use crate::error::AppError;

/// Write per-sample results to a CSV file.
///
/// `pull` is the sigma-normalized residual, left empty for unweighted data.
pub fn write_results_csv(path: &Path, residuals: &[SampleResidual]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create export CSV '{}'", path.display()), e)
    })?;

    writeln!(file, "x,y,sigma_y,y_fit,residual,pull")
        .map_err(|e| AppError::io("Failed to write export CSV header", e))?;

    for r in residuals {
        let s = &r.sample;
        let sigma = s.sigma_y.map(|v| format!("{v:.10}")).unwrap_or_default();
        let pull = s
            .sigma_y
            .map(|v| format!("{:.10}", r.residual / v))
            .unwrap_or_default();
        writeln!(
            file,
            "{:.10},{:.10},{sigma},{:.10},{:.10},{pull}",
            s.x, s.y, r.y_fit, r.residual
        )
        .map_err(|e| AppError::io("Failed to write export CSV row", e))?;
    }

    Ok(())
}
