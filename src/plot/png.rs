//! PNG rendering of data + fitted line.
//!
//! The renderer is intentionally data-driven: the samples, the precomputed
//! fitted grid, and the style are all resolved before this module is called,
//! so it only has to draw. Samples with uncertainties are drawn as error
//! bars; the sample list may also be empty when replotting a saved fit.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::Sample;
use crate::error::AppError;
use crate::plot::style::{PlotStyle, parse_color};

/// Text placed around the chart.
#[derive(Debug, Clone)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// Render samples and a fitted line to a PNG file.
pub fn render_fit_png(
    path: &Path,
    samples: &[Sample],
    curve: &[(f64, f64)],
    style: &PlotStyle,
    labels: &PlotLabels,
) -> Result<(), AppError> {
    let bounds = compute_bounds(samples, curve)
        .ok_or_else(|| AppError::new(2, "Nothing to plot (no samples and no fitted grid)."))?;

    // Resolve style up front so color errors surface before touching the file.
    let background = parse_color(&style.background)?;
    let data_color = parse_color(&style.data_color)?;
    let fit_color = parse_color(&style.fit_color)?;

    draw(
        path, samples, curve, style, labels, bounds, background, data_color, fit_color,
    )
    .map_err(|e| AppError::new(2, format!("Failed to render '{}': {e}", path.display())))
}

/// Axis bounds with a small margin around the data.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x: [f64; 2],
    y: [f64; 2],
}

fn compute_bounds(samples: &[Sample], curve: &[(f64, f64)]) -> Option<Bounds> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in samples {
        let sig = s.sigma_y.unwrap_or(0.0);
        x_min = x_min.min(s.x);
        x_max = x_max.max(s.x);
        y_min = y_min.min(s.y - sig);
        y_max = y_max.max(s.y + sig);
    }
    for &(x, y) in curve {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }

    // 5% margin; degenerate ranges get an absolute pad instead.
    let x_pad = ((x_max - x_min) * 0.05).max(1e-9);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-9);

    Some(Bounds {
        x: [x_min - x_pad, x_max + x_pad],
        y: [y_min - y_pad, y_max + y_pad],
    })
}

#[allow(clippy::too_many_arguments)]
fn draw(
    path: &Path,
    samples: &[Sample],
    curve: &[(f64, f64)],
    style: &PlotStyle,
    labels: &PlotLabels,
    bounds: Bounds,
    background: RGBColor,
    data_color: RGBColor,
    fit_color: RGBColor,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = style.pixel_size();
    let label_px = style.points_to_pixels(style.label_font_size);
    let title_px = style.points_to_pixels(style.title_font_size);
    let marker_px = style.points_to_pixels(style.marker_size) as i32;
    let line_px = style.points_to_pixels(style.line_width);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&background)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(label_px)
        .x_label_area_size(label_px * 3)
        .y_label_area_size(label_px * 4);
    if !labels.title.is_empty() {
        builder.caption(&labels.title, ("sans-serif", title_px));
    }
    let mut chart =
        builder.build_cartesian_2d(bounds.x[0]..bounds.x[1], bounds.y[0]..bounds.y[1])?;

    let mut mesh = chart.configure_mesh();
    if !style.grid {
        mesh.disable_x_mesh().disable_y_mesh();
    }
    mesh.x_desc(&labels.x_label)
        .y_desc(&labels.y_label)
        .label_style(("sans-serif", label_px))
        .axis_desc_style(("sans-serif", label_px))
        .draw()?;

    // Data first, fitted line on top.
    let has_sigma = samples.iter().any(|s| s.sigma_y.is_some());
    if has_sigma {
        chart
            .draw_series(samples.iter().map(|s| {
                let sig = s.sigma_y.unwrap_or(0.0);
                ErrorBar::new_vertical(
                    s.x,
                    s.y - sig,
                    s.y,
                    s.y + sig,
                    data_color.stroke_width(line_px.max(1)),
                    marker_px.max(1) as u32,
                )
            }))?
            .label("Data")
            .legend(move |(x, y)| Circle::new((x, y), 3, data_color.filled()));
    } else if !samples.is_empty() {
        chart
            .draw_series(
                samples
                    .iter()
                    .map(|s| Circle::new((s.x, s.y), marker_px.max(1), data_color.filled())),
            )?
            .label("Data")
            .legend(move |(x, y)| Circle::new((x, y), 3, data_color.filled()));
    }

    if !curve.is_empty() {
        chart
            .draw_series(LineSeries::new(
                curve.iter().copied(),
                fit_color.stroke_width(line_px.max(1)),
            ))?
            .label("Fit")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], fit_color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", label_px))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_include_error_bars() {
        let samples = vec![
            Sample { x: 0.0, y: 1.0, sigma_y: Some(0.5) },
            Sample { x: 2.0, y: 3.0, sigma_y: Some(1.0) },
        ];
        let b = compute_bounds(&samples, &[]).unwrap();
        assert!(b.y[0] < 0.5);
        assert!(b.y[1] > 4.0);
        assert!(b.x[0] < 0.0 && b.x[1] > 2.0);
    }

    #[test]
    fn bounds_cover_curve_only_plots() {
        let curve = vec![(0.0, -1.0), (5.0, 4.0)];
        let b = compute_bounds(&[], &curve).unwrap();
        assert!(b.x[0] < 0.0 && b.x[1] > 5.0);
        assert!(b.y[0] < -1.0 && b.y[1] > 4.0);
    }

    #[test]
    fn empty_inputs_have_no_bounds() {
        assert!(compute_bounds(&[], &[]).is_none());
    }
}
