//! Delimited data ingest and normalization.
//!
//! This module turns a headerless two- or three-column numeric text file into
//! a clean set of `Sample`s that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** (consistent column count, numeric values, clear errors)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (file order in, file order out)
//! - **Separation of concerns**: no fitting logic here
//!
//! The column count is locked to whatever the first usable row has: two
//! columns mean `(x, y)`, three mean `(x, y, σy)` with the uncertainty
//! aligned positionally to its `y` value. Blank lines and `#` comments are
//! skipped.

use std::fs::File;
use std::io::Read;

use csv::StringRecord;

use crate::domain::{DatasetStats, FitConfig, Sample};
use crate::error::AppError;
use crate::fit::goodness::N_PARAMS;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated samples + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub samples: Vec<Sample>,
    pub stats: DatasetStats,
    /// Whether the file carried an uncertainty column.
    pub has_sigma: bool,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and validate the input file named by the run configuration.
pub fn load_samples(config: &FitConfig) -> Result<IngestedData, AppError> {
    let file = File::open(&config.input).map_err(|e| {
        AppError::io(format!("Failed to open input '{}'", config.input.display()), e)
    })?;
    read_samples(file, config.delimiter)
}

/// Ingest from any reader (separated out so tests can feed byte slices).
pub fn read_samples<R: Read>(reader: R, delimiter: u8) -> Result<IngestedData, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    // Locked from the first usable row; deviations become row errors.
    let mut n_columns: Option<usize> = None;

    for (idx, result) in csv_reader.records().enumerate() {
        // Data files have no header, so records start on line 1.
        let line = idx + 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("parse error: {e}"),
                });
                rows_read += 1;
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue; // blank line
        }
        rows_read += 1;

        match parse_row(&record, &mut n_columns) {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = samples.len();
    if rows_used <= N_PARAMS {
        return Err(AppError::new(
            3,
            format!(
                "Need at least {} valid rows to fit a line, got {rows_used} \
                 ({} rows rejected).",
                N_PARAMS + 1,
                row_errors.len()
            ),
        ));
    }

    let stats = compute_stats(&samples)
        .ok_or_else(|| AppError::new(3, "No finite samples remain after validation."))?;

    Ok(IngestedData {
        has_sigma: n_columns == Some(3),
        samples,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(record: &StringRecord, n_columns: &mut Option<usize>) -> Result<Sample, String> {
    let width = record.len();
    match n_columns {
        Some(expected) if width != *expected => {
            return Err(format!("expected {expected} columns, found {width}"));
        }
        Some(_) => {}
        None => {
            if width != 2 && width != 3 {
                return Err(format!("expected 2 or 3 columns, found {width}"));
            }
            *n_columns = Some(width);
        }
    }

    let x = parse_field(record, 0, "x")?;
    let y = parse_field(record, 1, "y")?;
    let sigma_y = if width == 3 {
        let s = parse_field(record, 2, "σy")?;
        if s <= 0.0 {
            return Err(format!("invalid σy value {s} (must be > 0)"));
        }
        Some(s)
    } else {
        None
    };

    Ok(Sample { x, y, sigma_y })
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {name} value"))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid {name} value '{raw}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("non-finite {name} value '{raw}'"))
    }
}

fn compute_stats(samples: &[Sample]) -> Option<DatasetStats> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut sigma_max: Option<f64> = None;

    for s in samples {
        x_min = x_min.min(s.x);
        x_max = x_max.max(s.x);
        y_min = y_min.min(s.y);
        y_max = y_max.max(s.y);
        if let Some(sig) = s.sigma_y {
            sigma_max = Some(sigma_max.map_or(sig, |m: f64| m.max(sig)));
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }

    Some(DatasetStats {
        n_samples: samples.len(),
        x_min,
        x_max,
        y_min,
        y_max,
        sigma_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_column_file_parses() {
        let data = b"1.0,2.5\n2.0,3.5\n3.0,4.5\n";
        let out = read_samples(&data[..], b',').unwrap();

        assert_eq!(out.samples.len(), 3);
        assert!(!out.has_sigma);
        assert!(out.row_errors.is_empty());
        assert_eq!(out.samples[1], Sample { x: 2.0, y: 3.5, sigma_y: None });
        assert_eq!(out.stats.n_samples, 3);
        assert!((out.stats.x_max - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sigma_column_stays_aligned_with_its_row() {
        let data = b"1.0,2.5,0.1\n2.0,3.5,0.4\n3.0,4.5,0.9\n";
        let out = read_samples(&data[..], b',').unwrap();

        assert!(out.has_sigma);
        let sigmas: Vec<f64> = out.samples.iter().map(|s| s.sigma_y.unwrap()).collect();
        assert_eq!(sigmas, vec![0.1, 0.4, 0.9]);
        assert_eq!(out.stats.sigma_max, Some(0.9));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let data = b"# synthetic dataset\n1.0,2.0\n\n2.0,3.0\n3.0,4.0\n";
        let out = read_samples(&data[..], b',').unwrap();
        assert_eq!(out.samples.len(), 3);
        assert!(out.row_errors.is_empty());
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let data = b"1.0,2.0\nnope,3.0\n2.0,3.0\n3.0,4.0,0.5\n4.0,5.0\n";
        let out = read_samples(&data[..], b',').unwrap();

        assert_eq!(out.samples.len(), 3);
        assert_eq!(out.row_errors.len(), 2);
        assert_eq!(out.row_errors[0].line, 2);
        assert!(out.row_errors[0].message.contains("invalid x"));
        // Column count was locked to 2 by the first row.
        assert!(out.row_errors[1].message.contains("expected 2 columns"));
    }

    #[test]
    fn non_positive_sigma_is_rejected() {
        let data = b"1.0,2.0,0.5\n2.0,3.0,0.0\n3.0,4.0,0.5\n4.0,5.0,0.5\n";
        let out = read_samples(&data[..], b',').unwrap();
        assert_eq!(out.samples.len(), 3);
        assert!(out.row_errors[0].message.contains("must be > 0"));
    }

    #[test]
    fn too_few_valid_rows_is_fatal() {
        let data = b"1.0,2.0\n2.0,3.0\n";
        let err = read_samples(&data[..], b',').unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn alternative_delimiter_is_honored() {
        let data = b"1.0\t2.0\n2.0\t3.0\n3.0\t4.0\n";
        let out = read_samples(&data[..], b'\t').unwrap();
        assert_eq!(out.samples.len(), 3);
    }
}
