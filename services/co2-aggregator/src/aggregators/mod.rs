//! Aggregator implementations

pub mod interval;

pub use interval::{group_by_interval, Aggregation, IntervalAggregator, MalformedPolicy};
