//! Chart state owned by the caller and handed to renderers

use crate::aggregators::Aggregation;
use common::{BucketWidth, SeriesPoint};
use serde::Serialize;
use tracing::debug;

/// Data currently shown by the chart
///
/// Owned by whoever drives the pipeline; the only way to change it is
/// [`ChartState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartState {
    series: Vec<SeriesPoint>,
    source: Option<String>,
    bucket_width: Option<BucketWidth>,
    records_seen: usize,
    records_skipped: usize,
    revision: u64,
}

impl ChartState {
    /// Empty state, nothing loaded yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart data with a finished aggregation
    pub fn apply(&mut self, aggregation: Aggregation, source: impl Into<String>, width: BucketWidth) {
        let Aggregation {
            points,
            records_seen,
            records_skipped,
        } = aggregation;

        self.series = points;
        self.source = Some(source.into());
        self.bucket_width = Some(width);
        self.records_seen = records_seen;
        self.records_skipped = records_skipped;
        self.revision += 1;

        debug!(
            "Chart state revision {} now holds {} points",
            self.revision,
            self.series.len()
        );
    }

    /// Current series, ascending by interval start
    #[must_use]
    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    /// Label of the data source (usually the input path)
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Bucket width the series was built with
    #[must_use]
    pub const fn bucket_width(&self) -> Option<BucketWidth> {
        self.bucket_width
    }

    /// Records consumed by the last aggregation
    #[must_use]
    pub const fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Records left out by the last aggregation
    #[must_use]
    pub const fn records_skipped(&self) -> usize {
        self.records_skipped
    }

    /// Number of updates applied so far
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Nothing to plot
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
