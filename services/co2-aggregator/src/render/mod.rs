//! Chart renderers
//!
//! A renderer turns a [`ChartState`] into bytes: either a standalone SVG
//! line chart or the JSON point list a charting front end consumes.

pub mod json;
pub mod svg;

use crate::errors::RenderError;
use crate::state::ChartState;
use common::constants::{
    DEFAULT_CHART_HEIGHT_PX, DEFAULT_CHART_WIDTH_PX, DEFAULT_SERIES_COLOR, DEFAULT_SERIES_LABEL,
    DEFAULT_SERIES_STROKE_PX,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

pub use json::JsonSeries;
pub use svg::SvgLineChart;

/// Writes a chart for the given state
pub trait ChartRenderer {
    /// Render `state` into `out`
    fn render(&self, state: &ChartState, out: &mut dyn Write) -> Result<(), RenderError>;
}

/// Output format of the chart artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone SVG line chart
    #[default]
    Svg,
    /// JSON array of series points
    Json,
}

impl OutputFormat {
    /// Guess the format from an output file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected svg or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Chart appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Title drawn above the plot; defaults to the data source
    pub title: Option<String>,
    /// Legend label of the series
    pub series_label: String,
    /// Stroke colour of the series (any SVG colour)
    pub color: String,
    /// Stroke width of the series in pixels
    pub stroke_width: u32,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH_PX,
            height: DEFAULT_CHART_HEIGHT_PX,
            title: None,
            series_label: DEFAULT_SERIES_LABEL.to_string(),
            color: DEFAULT_SERIES_COLOR.to_string(),
            stroke_width: DEFAULT_SERIES_STROKE_PX,
            x_label: "Interval start (s)".to_string(),
            y_label: "Average CO2".to_string(),
        }
    }
}
