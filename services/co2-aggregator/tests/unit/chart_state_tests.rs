//! Tests for the owned chart state

use co2_aggregator::{Aggregation, ChartState, IntervalAggregator};
use common::{BucketWidth, SeriesPoint};
use pretty_assertions::assert_eq;

#[test]
fn test_new_state_is_empty() {
    let state = ChartState::new();

    assert!(state.is_empty());
    assert_eq!(state.revision(), 0);
    assert_eq!(state.source(), None);
    assert_eq!(state.bucket_width(), None);
}

#[test]
fn test_apply_replaces_series_and_bumps_revision() {
    let aggregator = IntervalAggregator::new(10.0).unwrap();
    let mut state = ChartState::new();

    let first = aggregator.aggregate([("0,0", "1,0"), ("15,0", "3,0")]).unwrap();
    state.apply(first, "first.csv", aggregator.width());
    assert_eq!(state.series().len(), 2);
    assert_eq!(state.revision(), 1);
    assert_eq!(state.source(), Some("first.csv"));

    let second = aggregator.aggregate([("40,0", "9,0")]).unwrap();
    state.apply(second, "second.csv", aggregator.width());
    assert_eq!(state.series(), &[SeriesPoint::new(40.0, 9.0, 1)]);
    assert_eq!(state.revision(), 2);
    assert_eq!(state.source(), Some("second.csv"));
    assert_eq!(state.records_seen(), 1);
}

#[test]
fn test_apply_empty_aggregation() {
    let mut state = ChartState::new();
    state.apply(
        Aggregation::default(),
        "empty.csv",
        BucketWidth::new(5.0).unwrap(),
    );

    assert!(state.is_empty());
    assert_eq!(state.revision(), 1);
    assert_eq!(state.bucket_width().map(|w| w.as_f64()), Some(5.0));
}

#[test]
fn test_apply_records_skip_counts() {
    let mut state = ChartState::new();
    state.apply(
        Aggregation {
            points: vec![SeriesPoint::new(0.0, 1.0, 2)],
            records_seen: 5,
            records_skipped: 3,
        },
        "partial.csv",
        BucketWidth::new(10.0).unwrap(),
    );

    assert_eq!(state.records_seen(), 5);
    assert_eq!(state.records_skipped(), 3);
}
