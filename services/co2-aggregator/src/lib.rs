//! CO2 Interval Aggregator
//!
//! Turns a sensor CSV export into a chartable series:
//! - Loads `;`-delimited files with `#` comment lines
//! - Groups readings into fixed-width time buckets
//! - Averages the measurement per bucket
//! - Renders the series as an SVG line chart or a JSON point list

pub mod aggregators;
pub mod config;
pub mod errors;
pub mod loader;
pub mod render;
pub mod state;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub use aggregators::{group_by_interval, Aggregation, IntervalAggregator, MalformedPolicy};
pub use config::{AggregatorConfig, LoaderConfig};
pub use errors::{ConfigError, LoadError, RenderError};
pub use loader::CsvLoader;
pub use render::{ChartConfig, ChartRenderer, JsonSeries, OutputFormat, SvgLineChart};
pub use state::ChartState;

/// Load `input`, aggregate it and apply the result to `state`.
///
/// This is the whole pipeline short of rendering; the caller decides
/// where the chart goes.
pub fn refresh_chart(
    config: &AggregatorConfig,
    input: &Path,
    state: &mut ChartState,
) -> Result<()> {
    let loader = CsvLoader::new(&config.loader)?;
    let records = loader
        .load_path(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let aggregator = IntervalAggregator::from_config(config)?;
    let aggregation = aggregator
        .aggregate(&records)
        .with_context(|| format!("Failed to aggregate {}", input.display()))?;

    info!(
        "Aggregated {} records from {} into {} buckets ({} skipped)",
        aggregation.records_seen,
        input.display(),
        aggregation.points.len(),
        aggregation.records_skipped
    );

    state.apply(aggregation, input.display().to_string(), aggregator.width());
    Ok(())
}

/// Render `state` in the requested format
pub fn render_chart(
    config: &AggregatorConfig,
    format: OutputFormat,
    state: &ChartState,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Svg => SvgLineChart::new(config.chart.clone()).render(state, out),
        OutputFormat::Json => JsonSeries::pretty().render(state, out),
    }
}
