//! Core types for the CO2 interval chart tools

use crate::errors::AggregationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that exposes a timestamp and a measurement as raw text
///
/// The aggregator only needs these two fields, so loaders and tests can
/// hand it whatever row type they have.
pub trait SensorRecord {
    /// Timestamp text, seconds since recording start
    fn timestamp(&self) -> &str;

    /// Measurement text
    fn measurement(&self) -> &str;

    /// Source line, for diagnostics only
    fn line(&self) -> Option<u64> {
        None
    }
}

impl<T: SensorRecord + ?Sized> SensorRecord for &T {
    fn timestamp(&self) -> &str {
        (**self).timestamp()
    }

    fn measurement(&self) -> &str {
        (**self).measurement()
    }

    fn line(&self) -> Option<u64> {
        (**self).line()
    }
}

impl SensorRecord for (&str, &str) {
    fn timestamp(&self) -> &str {
        self.0
    }

    fn measurement(&self) -> &str {
        self.1
    }
}

impl SensorRecord for (String, String) {
    fn timestamp(&self) -> &str {
        &self.0
    }

    fn measurement(&self) -> &str {
        &self.1
    }
}

/// One input row as read from the CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based line number in the source file
    pub line: u64,
    /// Timestamp field, verbatim
    pub time: String,
    /// Measurement field, verbatim
    pub value: String,
}

impl RawRecord {
    /// Create a new record
    #[must_use]
    pub fn new(line: u64, time: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            line,
            time: time.into(),
            value: value.into(),
        }
    }
}

impl SensorRecord for RawRecord {
    fn timestamp(&self) -> &str {
        &self.time
    }

    fn measurement(&self) -> &str {
        &self.value
    }

    fn line(&self) -> Option<u64> {
        Some(self.line)
    }
}

/// Width of an aggregation bucket, in timestamp units
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct BucketWidth(f64);

impl BucketWidth {
    /// Validate and wrap a bucket width
    pub fn new(width: f64) -> Result<Self, AggregationError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(AggregationError::InvalidArgument(format!(
                "bucket width must be a positive number, got {width}"
            )));
        }
        Ok(Self(width))
    }

    /// Width as f64
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Bucket index of `timestamp`: `floor(timestamp / width)`.
    ///
    /// `None` when the quotient is not representable as an `i64`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_of(&self, timestamp: f64) -> Option<i64> {
        let index = (timestamp / self.0).floor();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        if index.is_finite() && index >= i64::MIN as f64 && index < i64::MAX as f64 {
            Some(index as i64)
        } else {
            None
        }
    }

    /// Start of the bucket with the given index
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn start_of(&self, index: i64) -> f64 {
        index as f64 * self.0
    }
}

impl<'de> Deserialize<'de> for BucketWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let width = f64::deserialize(deserializer)?;
        Self::new(width).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// One point of the aggregated series handed to the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Bucket start (index × width), same unit as the input timestamps
    pub interval_start: f64,
    /// Arithmetic mean of the measurements in the bucket
    pub average_value: f64,
    /// Number of records that contributed
    pub samples: u64,
}

impl SeriesPoint {
    /// Create a new series point
    #[must_use]
    pub const fn new(interval_start: f64, average_value: f64, samples: u64) -> Self {
        Self {
            interval_start,
            average_value,
            samples,
        }
    }

    /// Both coordinates are plottable
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.interval_start.is_finite() && self.average_value.is_finite()
    }
}
