//! SVG line chart renderer
//!
//! Maps data space (interval start, average) onto a padded plot area,
//! draws a labelled grid and one polyline per run of finite points.

use super::{ChartConfig, ChartRenderer};
use crate::errors::RenderError;
use crate::state::ChartState;
use common::SeriesPoint;
use std::fmt::Write as _;
use std::io::Write;

/// Plot padding in pixels (top, right, bottom, left)
const PADDING_TOP_PX: f64 = 48.0;
const PADDING_RIGHT_PX: f64 = 24.0;
const PADDING_BOTTOM_PX: f64 = 56.0;
const PADDING_LEFT_PX: f64 = 72.0;

/// Grid divisions on each axis
const GRID_DIVISIONS: usize = 5;

/// Margin added around the data range (10%)
const AUTO_SCALE_MARGIN_FACTOR: f64 = 0.1;

/// Minimum data range, keeps flat or single-point series drawable
const MIN_DATA_RANGE: f64 = 1.0;

const GRID_COLOR: &str = "#e5e7eb";
const AXIS_COLOR: &str = "#6b7280";
const TEXT_COLOR: &str = "#111827";

/// Data space bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    /// Minimum X value
    pub x_min: f64,
    /// Maximum X value
    pub x_max: f64,
    /// Minimum Y value
    pub y_min: f64,
    /// Maximum Y value
    pub y_max: f64,
}

impl DataBounds {
    /// Bounds of the finite points plus a margin; `None` if there are none
    #[must_use]
    pub fn from_points(points: &[SeriesPoint], margin_factor: f64) -> Option<Self> {
        let mut finite = points.iter().filter(|p| p.is_finite());
        let first = finite.next()?;
        let (mut x_min, mut x_max) = (first.interval_start, first.interval_start);
        let (mut y_min, mut y_max) = (first.average_value, first.average_value);

        for point in finite {
            x_min = x_min.min(point.interval_start);
            x_max = x_max.max(point.interval_start);
            y_min = y_min.min(point.average_value);
            y_max = y_max.max(point.average_value);
        }

        let x_range = (x_max - x_min).max(MIN_DATA_RANGE);
        let y_range = (y_max - y_min).max(MIN_DATA_RANGE);
        let x_center = (x_max + x_min) / 2.0;
        let y_center = (y_max + y_min) / 2.0;
        let x_half = x_range * (0.5 + margin_factor);
        let y_half = y_range * (0.5 + margin_factor);

        Some(Self {
            x_min: x_center - x_half,
            x_max: x_center + x_half,
            y_min: y_center - y_half,
            y_max: y_center + y_half,
        })
    }

    /// X range
    #[must_use]
    pub fn x_range(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Y range
    #[must_use]
    pub fn y_range(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Pixel rectangle of the plot area together with the data bounds it shows
#[derive(Debug, Clone, Copy)]
struct Viewport {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    bounds: DataBounds,
}

impl Viewport {
    fn new(config: &ChartConfig, bounds: DataBounds) -> Self {
        let width = (f64::from(config.width) - PADDING_LEFT_PX - PADDING_RIGHT_PX).max(1.0);
        let height = (f64::from(config.height) - PADDING_TOP_PX - PADDING_BOTTOM_PX).max(1.0);
        Self {
            left: PADDING_LEFT_PX,
            top: PADDING_TOP_PX,
            width,
            height,
            bounds,
        }
    }

    fn x_to_px(&self, x: f64) -> f64 {
        self.left + (x - self.bounds.x_min) / self.bounds.x_range() * self.width
    }

    fn y_to_px(&self, y: f64) -> f64 {
        self.top + self.height - (y - self.bounds.y_min) / self.bounds.y_range() * self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Renders the series as a standalone SVG document
#[derive(Debug, Clone, Default)]
pub struct SvgLineChart {
    config: ChartConfig,
}

impl SvgLineChart {
    /// Create a renderer with the given appearance
    #[must_use]
    pub const fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Build the SVG document as a string
    #[must_use]
    pub fn to_svg(&self, state: &ChartState) -> String {
        let config = &self.config;
        let mut doc = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = config.width,
            h = config.height
        );
        let _ = writeln!(doc, r#"<rect width="100%" height="100%" fill="white"/>"#);

        let title = config
            .title
            .as_deref()
            .or_else(|| state.source())
            .unwrap_or("CO2 emissions");
        let _ = writeln!(
            doc,
            r#"<text x="{x:.2}" y="24" text-anchor="middle" font-size="16" fill="{TEXT_COLOR}">{}</text>"#,
            escape_xml(title),
            x = f64::from(config.width) / 2.0
        );

        match DataBounds::from_points(state.series(), AUTO_SCALE_MARGIN_FACTOR) {
            Some(bounds) => {
                let viewport = Viewport::new(config, bounds);
                self.write_grid(&mut doc, &viewport);
                self.write_series(&mut doc, &viewport, state.series());
                self.write_legend(&mut doc, &viewport);
            }
            None => {
                let _ = writeln!(
                    doc,
                    r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" fill="{AXIS_COLOR}">No data</text>"#,
                    x = f64::from(config.width) / 2.0,
                    y = f64::from(config.height) / 2.0
                );
            }
        }

        if let Some(width) = state.bucket_width() {
            let _ = writeln!(
                doc,
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" font-size="10" fill="{AXIS_COLOR}">bucket {width}, {seen} records, {skipped} skipped</text>"#,
                x = f64::from(config.width) - PADDING_RIGHT_PX,
                y = f64::from(config.height) - 6.0,
                seen = state.records_seen(),
                skipped = state.records_skipped()
            );
        }

        doc.push_str("</svg>\n");
        doc
    }

    fn write_grid(&self, doc: &mut String, viewport: &Viewport) {
        let bounds = viewport.bounds;
        let x_decimals = tick_decimals(bounds.x_range());
        let y_decimals = tick_decimals(bounds.y_range());

        let _ = writeln!(doc, r#"<g stroke="{GRID_COLOR}" stroke-width="1">"#);
        for i in 0..=GRID_DIVISIONS {
            let t = i as f64 / GRID_DIVISIONS as f64;
            let x = viewport.left + t * viewport.width;
            let y = viewport.top + t * viewport.height;
            let _ = writeln!(
                doc,
                r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}"/>"#,
                viewport.top,
                viewport.bottom()
            );
            let _ = writeln!(
                doc,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}"/>"#,
                viewport.left,
                viewport.right()
            );
        }
        doc.push_str("</g>\n");

        let _ = writeln!(doc, r#"<g fill="{AXIS_COLOR}">"#);
        for i in 0..=GRID_DIVISIONS {
            let t = i as f64 / GRID_DIVISIONS as f64;
            let x_value = bounds.x_min + t * bounds.x_range();
            let y_value = bounds.y_max - t * bounds.y_range();
            let _ = writeln!(
                doc,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{x_value:.x_decimals$}</text>"#,
                viewport.x_to_px(x_value),
                viewport.bottom() + 16.0
            );
            let _ = writeln!(
                doc,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end" dominant-baseline="middle">{y_value:.y_decimals$}</text>"#,
                viewport.left - 6.0,
                viewport.y_to_px(y_value)
            );
        }
        doc.push_str("</g>\n");

        let _ = writeln!(
            doc,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{AXIS_COLOR}"/>"#,
            viewport.left, viewport.top, viewport.width, viewport.height
        );
        let _ = writeln!(
            doc,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="{TEXT_COLOR}">{}</text>"#,
            viewport.left + viewport.width / 2.0,
            viewport.bottom() + 36.0,
            escape_xml(&self.config.x_label)
        );
        let y_label_x = 16.0;
        let y_label_y = viewport.top + viewport.height / 2.0;
        let _ = writeln!(
            doc,
            r#"<text x="{y_label_x:.2}" y="{y_label_y:.2}" text-anchor="middle" fill="{TEXT_COLOR}" transform="rotate(-90 {y_label_x:.2} {y_label_y:.2})">{}</text>"#,
            escape_xml(&self.config.y_label)
        );
    }

    fn write_series(&self, doc: &mut String, viewport: &Viewport, points: &[SeriesPoint]) {
        let stroke = escape_xml(&self.config.color);
        for segment in finite_segments(points) {
            let coords: Vec<(f64, f64)> = segment
                .iter()
                .map(|p| (viewport.x_to_px(p.interval_start), viewport.y_to_px(p.average_value)))
                .collect();

            let mut vertices = String::new();
            for (i, (x, y)) in coords.iter().enumerate() {
                if i > 0 {
                    vertices.push(' ');
                }
                let _ = write!(vertices, "{x:.2},{y:.2}");
            }
            let _ = writeln!(
                doc,
                r#"<polyline class="series" fill="none" stroke="{stroke}" stroke-width="{}" stroke-linejoin="round" points="{vertices}"/>"#,
                self.config.stroke_width
            );

            // A lone point would otherwise be invisible
            if let [(x, y)] = coords.as_slice() {
                let _ = writeln!(
                    doc,
                    r#"<circle cx="{x:.2}" cy="{y:.2}" r="{}" fill="{stroke}"/>"#,
                    self.config.stroke_width.max(2)
                );
            }
        }
    }

    fn write_legend(&self, doc: &mut String, viewport: &Viewport) {
        let x = viewport.right() - 160.0;
        let y = viewport.top - 12.0;
        let _ = writeln!(
            doc,
            r#"<line x1="{x:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="{}"/>"#,
            x + 18.0,
            escape_xml(&self.config.color),
            self.config.stroke_width
        );
        let _ = writeln!(
            doc,
            r#"<text x="{:.2}" y="{y:.2}" dominant-baseline="middle" fill="{TEXT_COLOR}">{}</text>"#,
            x + 24.0,
            escape_xml(&self.config.series_label)
        );
    }
}

impl ChartRenderer for SvgLineChart {
    fn render(&self, state: &ChartState, out: &mut dyn Write) -> Result<(), RenderError> {
        out.write_all(self.to_svg(state).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Runs of consecutive points that can be plotted
fn finite_segments(points: &[SeriesPoint]) -> impl Iterator<Item = &[SeriesPoint]> {
    points
        .split(|p| !p.is_finite())
        .filter(|segment| !segment.is_empty())
}

/// Decimals for tick labels given the visible range
fn tick_decimals(range: f64) -> usize {
    if range >= 100.0 {
        0
    } else if range >= 1.0 {
        1
    } else {
        3
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
