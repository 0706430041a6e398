//! Shared fit pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> fit -> residuals
//!
//! The CLI can then focus on presentation (printing, plots, exports).

use crate::domain::{FitConfig, FitQuality, LineFit, SampleResidual};
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// All computed outputs of a single `linfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: LineFit,
    pub quality: FitQuality,
    pub weighted: bool,
    pub residuals: Vec<SampleResidual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate the input file.
    let ingest = crate::io::ingest::load_samples(config)?;

    // 2) Fit the line under the configured weighting.
    let fitted = crate::fit::fit_line(&ingest.samples, config.weight_mode)?;

    // 3) Compute per-sample residuals for reports and exports.
    let residuals = crate::report::compute_residuals(&ingest.samples, &fitted.fit)?;

    Ok(RunOutput {
        ingest,
        fit: fitted.fit,
        quality: fitted.quality,
        weighted: fitted.weighted,
        residuals,
    })
}
