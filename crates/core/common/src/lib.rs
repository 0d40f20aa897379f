//! Common types and utilities shared by the CO2 interval chart crates
//!
//! - Record and series types flowing between loader, aggregator and renderers
//! - Locale-aware decimal parsing
//! - Aggregation error types
//! - Shared constants

pub mod constants;
pub mod decimal;
pub mod errors;
pub mod types;

pub use decimal::{DecimalSeparator, ParseDecimalError};
pub use errors::{AggregationError, Field, RecordLabel};
pub use types::{BucketWidth, RawRecord, SensorRecord, SeriesPoint};
