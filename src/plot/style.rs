//! Declarative plot styling.
//!
//! `PlotStyle` controls appearance only (colors, sizes, DPI); it is consumed
//! wholesale by the renderer and interpreted by nothing else. A style can be
//! loaded from a JSON file via `--style`; missing fields fall back to the
//! defaults, so a style file only needs to name what it changes.
//!
//! Sizes follow print conventions: the figure is specified in inches, text
//! and strokes in points, and the DPI setting converts both to pixels.

use std::fs::File;
use std::path::Path;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    /// Figure width in inches.
    pub fig_width: f64,
    /// Figure height in inches.
    pub fig_height: f64,
    /// Output resolution in dots per inch.
    pub dpi: u32,

    /// Colors as `#rrggbb` hex strings.
    pub background: String,
    pub data_color: String,
    pub fit_color: String,

    /// Marker radius in points.
    pub marker_size: f64,
    /// Fitted-line stroke width in points.
    pub line_width: f64,
    /// Axis label and tick font size in points.
    pub label_font_size: f64,
    /// Title font size in points.
    pub title_font_size: f64,

    /// Draw mesh grid lines behind the data.
    pub grid: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            fig_width: 6.4,
            fig_height: 4.8,
            dpi: 300,
            background: "#ffffff".to_string(),
            data_color: "#d62728".to_string(),
            fit_color: "#1f77b4".to_string(),
            marker_size: 2.0,
            line_width: 1.5,
            label_font_size: 10.0,
            title_font_size: 12.0,
            grid: false,
        }
    }
}

impl PlotStyle {
    /// Load a style JSON file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::io(format!("Failed to open style '{}'", path.display()), e))?;
        serde_json::from_reader(file)
            .map_err(|e| AppError::new(2, format!("Invalid style JSON '{}': {e}", path.display())))
    }

    /// Figure size in pixels at the configured DPI.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.fig_width * self.dpi as f64).round().max(1.0) as u32,
            (self.fig_height * self.dpi as f64).round().max(1.0) as u32,
        )
    }

    /// Convert a size in points to pixels at the configured DPI.
    pub fn points_to_pixels(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }
}

/// Parse a `#rrggbb` hex color.
pub fn parse_color(s: &str) -> Result<RGBColor, AppError> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::new(
            2,
            format!("Invalid color '{s}' (expected #rrggbb)."),
        ));
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    Ok(RGBColor(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert_to_sensible_pixel_sizes() {
        let style = PlotStyle::default();
        assert_eq!(style.pixel_size(), (1920, 1440));
        // 10pt at 300 DPI ≈ 42 px.
        assert_eq!(style.points_to_pixels(style.label_font_size), 42);
    }

    #[test]
    fn partial_style_json_falls_back_to_defaults() {
        let style: PlotStyle = serde_json::from_str(r##"{"dpi": 100, "grid": true}"##).unwrap();
        assert_eq!(style.dpi, 100);
        assert!(style.grid);
        assert!((style.fig_width - 6.4).abs() < 1e-12);
    }

    #[test]
    fn unknown_style_fields_are_rejected() {
        let out: Result<PlotStyle, _> = serde_json::from_str(r##"{"dpl": 100}"##);
        assert!(out.is_err());
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_color("#1f77b4").unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(parse_color("ffffff").unwrap(), RGBColor(255, 255, 255));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }
}
