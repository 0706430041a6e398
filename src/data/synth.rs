//! Synthetic dataset generation.
//!
//! Produces reproducible practice files for the fitter: samples drawn from a
//! known line `y = intercept + slope·x` with Gaussian noise. With an
//! uncertainty column, each point gets its own σ drawn uniformly from
//! `[sigma_min, sigma_max]` and noise `Normal(0, σ)`; without one, the noise
//! level is the midpoint of that range. A fit of the generated file should
//! recover the true parameters within the stated uncertainties.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Sample;
use crate::error::AppError;

/// Settings for one generated dataset.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub count: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub intercept: f64,
    pub slope: f64,
    pub sigma_min: f64,
    pub sigma_max: f64,
    /// Whether to emit the third (σy) column.
    pub with_sigma: bool,
    pub seed: u64,
}

/// Generate samples from a known line with Gaussian noise.
pub fn generate_samples(config: &SynthConfig) -> Result<Vec<Sample>, AppError> {
    if config.count < 3 {
        return Err(AppError::new(2, "Sample count must be at least 3."));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if !(config.sigma_min.is_finite()
        && config.sigma_max.is_finite()
        && config.sigma_min > 0.0
        && config.sigma_max >= config.sigma_min)
    {
        return Err(AppError::new(2, "Invalid σ range (need 0 < sigma_min <= sigma_max)."));
    }
    if !(config.intercept.is_finite() && config.slope.is_finite()) {
        return Err(AppError::new(2, "Invalid line parameters for sample generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mid_sigma = 0.5 * (config.sigma_min + config.sigma_max);

    let mut samples = Vec::with_capacity(config.count);
    for i in 0..config.count {
        // Evenly spaced x keeps the files easy to eyeball; only the noise is random.
        let u = i as f64 / (config.count as f64 - 1.0);
        let x = config.x_min + u * (config.x_max - config.x_min);

        let sigma = if config.with_sigma {
            rng.gen_range(config.sigma_min..=config.sigma_max)
        } else {
            mid_sigma
        };
        let noise = Normal::new(0.0, sigma)
            .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?
            .sample(&mut rng);

        samples.push(Sample {
            x,
            y: config.intercept + config.slope * x + noise,
            sigma_y: config.with_sigma.then_some(sigma),
        });
    }

    Ok(samples)
}

/// Write samples as a headerless delimited file (the fitter's input format).
pub fn write_samples(path: &Path, samples: &[Sample], delimiter: u8) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create '{}'", path.display()), e))?;
    let d = delimiter as char;

    for s in samples {
        let line = match s.sigma_y {
            Some(sig) => format!("{:.6}{d}{:.6}{d}{:.6}", s.x, s.y, sig),
            None => format!("{:.6}{d}{:.6}", s.x, s.y),
        };
        writeln!(file, "{line}")
            .map_err(|e| AppError::io(format!("Failed to write '{}'", path.display()), e))?;
    }

    Ok(())
}
