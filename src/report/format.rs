//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FitConfig, FitQuality, LineFit};
use crate::io::ingest::IngestedData;

/// Format the full run summary (dataset stats + parameters + diagnostics).
pub fn format_fit_summary(
    ingest: &IngestedData,
    fit: &LineFit,
    quality: &FitQuality,
    weighted: bool,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== linfit - straight line fit ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!(
        "Samples: n={} | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        ingest.stats.n_samples,
        ingest.stats.x_min,
        ingest.stats.x_max,
        ingest.stats.y_min,
        ingest.stats.y_max
    ));
    if ingest.rows_read != ingest.rows_used {
        out.push_str(&format!(
            "Rows: read={} used={} rejected={}\n",
            ingest.rows_read,
            ingest.rows_used,
            ingest.row_errors.len()
        ));
    }
    out.push_str(&format!(
        "Weighting: {}\n",
        if weighted { "1/σ² (absolute)" } else { "uniform" }
    ));

    out.push_str("\nFit: y = intercept + slope·x\n");
    out.push_str(&format!(
        "  slope     = {:>12.6} ± {:.6}\n",
        fit.slope,
        fit.slope_err()
    ));
    out.push_str(&format!(
        "  intercept = {:>12.6} ± {:.6}\n",
        fit.intercept,
        fit.intercept_err()
    ));

    out.push_str("\nGoodness of fit:\n");
    match (quality.chi2, quality.chi2_red) {
        (Some(chi2), Some(chi2_red)) => {
            out.push_str(&format!(
                "  chi² = {chi2:.4} | dof = {} | reduced chi² = {chi2_red:.4}\n",
                quality.dof
            ));
        }
        _ => {
            out.push_str(&format!(
                "  dof = {} (no uncertainties, chi² unavailable)\n",
                quality.dof
            ));
        }
    }
    out.push_str(&format!("  rmse = {:.6}\n", quality.rmse));

    out
}
