//! Tests for the SVG and JSON chart renderers

use anyhow::Result;
use co2_aggregator::{
    Aggregation, ChartConfig, ChartRenderer, ChartState, JsonSeries, SvgLineChart,
};
use common::{BucketWidth, SeriesPoint};
use pretty_assertions::assert_eq;
use rstest::*;

fn state_with(points: Vec<SeriesPoint>) -> ChartState {
    let records_seen = points.iter().map(|p| p.samples as usize).sum();
    let mut state = ChartState::new();
    state.apply(
        Aggregation {
            points,
            records_seen,
            records_skipped: 0,
        },
        "readings.csv",
        BucketWidth::new(10.0).unwrap(),
    );
    state
}

/// Three chronological buckets
#[fixture]
fn three_point_state() -> ChartState {
    state_with(vec![
        SeriesPoint::new(0.0, 410.0, 3),
        SeriesPoint::new(10.0, 440.0, 3),
        SeriesPoint::new(20.0, 460.0, 1),
    ])
}

fn render_to_string(renderer: &dyn ChartRenderer, state: &ChartState) -> Result<String> {
    let mut out = Vec::new();
    renderer.render(state, &mut out)?;
    Ok(String::from_utf8(out)?)
}

/// Vertex count of every `<polyline>` in the document
fn polyline_vertex_counts(svg: &str) -> Vec<usize> {
    svg.lines()
        .filter(|line| line.starts_with("<polyline"))
        .filter_map(|line| line.split("points=\"").nth(1))
        .filter_map(|rest| rest.split('"').next())
        .map(|points| points.split_whitespace().count())
        .collect()
}

#[rstest]
fn test_svg_has_one_vertex_per_point(three_point_state: ChartState) -> Result<()> {
    let svg = render_to_string(&SvgLineChart::default(), &three_point_state)?;

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(polyline_vertex_counts(&svg), vec![3]);
    Ok(())
}

#[rstest]
fn test_svg_vertices_run_left_to_right_and_rise(three_point_state: ChartState) -> Result<()> {
    let svg = render_to_string(&SvgLineChart::default(), &three_point_state)?;
    let line = svg
        .lines()
        .find(|l| l.starts_with("<polyline"))
        .expect("polyline present");
    let points = line.split("points=\"").nth(1).unwrap().split('"').next().unwrap();
    let coords: Vec<(f64, f64)> = points
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').unwrap();
            (x.parse().unwrap(), y.parse().unwrap())
        })
        .collect();

    assert!(coords.windows(2).all(|w| w[0].0 < w[1].0));
    // Higher averages sit higher on the canvas, i.e. smaller y
    assert!(coords.windows(2).all(|w| w[0].1 > w[1].1));
    Ok(())
}

#[rstest]
fn test_svg_labels_and_title(three_point_state: ChartState) -> Result<()> {
    let config = ChartConfig {
        title: Some("Office <east> & lab".to_string()),
        ..ChartConfig::default()
    };
    let svg = render_to_string(&SvgLineChart::new(config), &three_point_state)?;

    assert!(svg.contains("Office &lt;east&gt; &amp; lab"));
    assert!(svg.contains(">Interval start (s)</text>"));
    assert!(svg.contains(">Average CO2</text>"));
    assert!(svg.contains(">Average CO2 Emissions</text>"));
    assert!(svg.contains("bucket 10s, 7 records, 0 skipped"));
    Ok(())
}

#[rstest]
fn test_svg_title_defaults_to_source(three_point_state: ChartState) -> Result<()> {
    let svg = render_to_string(&SvgLineChart::default(), &three_point_state)?;
    assert!(svg.contains(">readings.csv</text>"));
    Ok(())
}

#[test]
fn test_svg_empty_series_shows_placeholder() -> Result<()> {
    let svg = render_to_string(&SvgLineChart::default(), &ChartState::new())?;

    assert!(svg.contains(">No data</text>"));
    assert!(polyline_vertex_counts(&svg).is_empty());
    Ok(())
}

#[test]
fn test_svg_breaks_line_at_nan() -> Result<()> {
    let state = state_with(vec![
        SeriesPoint::new(0.0, 400.0, 1),
        SeriesPoint::new(10.0, 410.0, 1),
        SeriesPoint::new(20.0, f64::NAN, 1),
        SeriesPoint::new(30.0, 430.0, 1),
        SeriesPoint::new(f64::NAN, 450.0, 1),
    ]);
    let svg = render_to_string(&SvgLineChart::default(), &state)?;

    assert_eq!(polyline_vertex_counts(&svg), vec![2, 1]);
    // the lone point gets a marker
    assert_eq!(svg.matches("<circle").count(), 1);
    assert!(!svg.contains("NaN"));
    Ok(())
}

#[test]
fn test_svg_single_point_is_drawable() -> Result<()> {
    let state = state_with(vec![SeriesPoint::new(0.0, 400.0, 5)]);
    let svg = render_to_string(&SvgLineChart::default(), &state)?;

    assert_eq!(polyline_vertex_counts(&svg), vec![1]);
    assert!(!svg.contains("NaN"));
    assert!(!svg.contains("inf"));
    Ok(())
}

#[rstest]
fn test_json_series_contract(three_point_state: ChartState) -> Result<()> {
    let json = render_to_string(&JsonSeries::compact(), &three_point_state)?;

    assert_eq!(
        json,
        "[{\"intervalStart\":0.0,\"averageValue\":410.0,\"samples\":3},\
         {\"intervalStart\":10.0,\"averageValue\":440.0,\"samples\":3},\
         {\"intervalStart\":20.0,\"averageValue\":460.0,\"samples\":1}]\n"
    );

    let parsed: Vec<SeriesPoint> = serde_json::from_str(&json)?;
    assert_eq!(parsed, three_point_state.series());
    Ok(())
}

#[test]
fn test_json_nan_becomes_null() -> Result<()> {
    let state = state_with(vec![SeriesPoint::new(0.0, f64::NAN, 1)]);
    let json = render_to_string(&JsonSeries::compact(), &state)?;

    assert_eq!(json, "[{\"intervalStart\":0.0,\"averageValue\":null,\"samples\":1}]\n");
    Ok(())
}

#[test]
fn test_json_empty_series() -> Result<()> {
    let json = render_to_string(&JsonSeries::pretty(), &ChartState::new())?;
    assert_eq!(json.trim(), "[]");
    Ok(())
}
