//! Fixed-width interval aggregator
//!
//! Groups sensor records into buckets of `width` seconds, keyed by
//! `floor(timestamp / width)`, and averages the measurement per bucket.
//! Output is chronological: buckets are kept in an ordered map.

use crate::config::AggregatorConfig;
use common::{
    AggregationError, BucketWidth, DecimalSeparator, Field, RecordLabel, SensorRecord, SeriesPoint,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do with a record whose timestamp or measurement is not a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole aggregation with [`AggregationError::Parse`]
    #[default]
    Reject,
    /// Log the record and leave it out of every bucket
    Skip,
    /// Legacy behavior: the field becomes `NaN` and still counts towards its bucket
    Propagate,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown malformed-record policy '{other}' (expected reject, skip or propagate)"
            )),
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Skip => write!(f, "skip"),
            Self::Propagate => write!(f, "propagate"),
        }
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregation {
    /// One point per bucket, ascending by interval start
    pub points: Vec<SeriesPoint>,
    /// Records consumed, including skipped ones
    pub records_seen: usize,
    /// Records left out under [`MalformedPolicy::Skip`]
    pub records_skipped: usize,
}

/// Running sum and count for one bucket
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: f64,
    count: u64,
}

impl Bucket {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn average(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Where a single record ends up
enum Placement {
    Bucket(i64, f64),
    /// No representable bucket index; only produced under `Propagate`
    Unplaced(f64),
    Skipped,
}

/// Averages a measurement over fixed-width time buckets
#[derive(Debug, Clone, Copy)]
pub struct IntervalAggregator {
    width: BucketWidth,
    decimal: DecimalSeparator,
    policy: MalformedPolicy,
}

impl IntervalAggregator {
    /// Create an aggregator with comma decimals and the `Reject` policy.
    ///
    /// Fails with [`AggregationError::InvalidArgument`] unless `width` is
    /// a finite positive number.
    pub fn new(width: f64) -> Result<Self, AggregationError> {
        Ok(Self {
            width: BucketWidth::new(width)?,
            decimal: DecimalSeparator::default(),
            policy: MalformedPolicy::default(),
        })
    }

    /// Build from configuration
    pub fn from_config(config: &AggregatorConfig) -> Result<Self, AggregationError> {
        Ok(Self::new(config.bucket_width_secs)?
            .with_decimal(config.decimal_separator)
            .with_policy(config.on_malformed))
    }

    /// Use a different decimal convention
    #[must_use]
    pub const fn with_decimal(mut self, decimal: DecimalSeparator) -> Self {
        self.decimal = decimal;
        self
    }

    /// Use a different malformed-record policy
    #[must_use]
    pub const fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bucket width in use
    #[must_use]
    pub const fn width(&self) -> BucketWidth {
        self.width
    }

    /// Malformed-record policy in use
    #[must_use]
    pub const fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Aggregate `records` into one series point per observed bucket.
    ///
    /// Points come out in ascending bucket order. Under
    /// [`MalformedPolicy::Propagate`] records without a representable
    /// bucket are collected into a trailing point with a `NaN` start.
    pub fn aggregate<I>(&self, records: I) -> Result<Aggregation, AggregationError>
    where
        I: IntoIterator,
        I::Item: SensorRecord,
    {
        let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
        let mut unplaced: Option<Bucket> = None;
        let mut records_seen = 0usize;
        let mut records_skipped = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            records_seen += 1;
            match self.place(position, &record)? {
                Placement::Bucket(index, value) => buckets.entry(index).or_default().add(value),
                Placement::Unplaced(value) => unplaced.get_or_insert_with(Bucket::default).add(value),
                Placement::Skipped => records_skipped += 1,
            }
        }

        let mut points: Vec<SeriesPoint> = buckets
            .into_iter()
            .map(|(index, bucket)| {
                SeriesPoint::new(self.width.start_of(index), bucket.average(), bucket.count)
            })
            .collect();
        if let Some(bucket) = unplaced {
            points.push(SeriesPoint::new(f64::NAN, bucket.average(), bucket.count));
        }

        debug!(
            "Aggregated {} records into {} buckets of {} ({} skipped, policy {})",
            records_seen,
            points.len(),
            self.width,
            records_skipped,
            self.policy
        );

        Ok(Aggregation {
            points,
            records_seen,
            records_skipped,
        })
    }

    fn place<R: SensorRecord>(
        &self,
        position: usize,
        record: &R,
    ) -> Result<Placement, AggregationError> {
        let label = RecordLabel::new(position, record.line());
        let Some(timestamp) = self.read_field(label, Field::Timestamp, record.timestamp())? else {
            return Ok(Placement::Skipped);
        };
        let Some(measurement) =
            self.read_field(label, Field::Measurement, record.measurement())?
        else {
            return Ok(Placement::Skipped);
        };

        if let Some(index) = self.width.index_of(timestamp) {
            return Ok(Placement::Bucket(index, measurement));
        }

        match self.policy {
            MalformedPolicy::Propagate => Ok(Placement::Unplaced(measurement)),
            MalformedPolicy::Reject => Err(AggregationError::TimestampOutOfRange {
                position,
                line: label.line,
                timestamp,
                width: self.width.as_f64(),
            }),
            MalformedPolicy::Skip => {
                warn!(
                    "Skipping {}: timestamp {} has no bucket at width {}",
                    label, timestamp, self.width
                );
                Ok(Placement::Skipped)
            }
        }
    }

    /// `Ok(None)` means the record is to be skipped
    fn read_field(
        &self,
        label: RecordLabel,
        field: Field,
        text: &str,
    ) -> Result<Option<f64>, AggregationError> {
        match self.decimal.parse(text) {
            Ok(value) => Ok(Some(value)),
            Err(source) => match self.policy {
                MalformedPolicy::Reject => Err(AggregationError::Parse {
                    position: label.position,
                    line: label.line,
                    field,
                    source,
                }),
                MalformedPolicy::Skip => {
                    warn!("Skipping {}: invalid {}: {}", label, field, source);
                    Ok(None)
                }
                MalformedPolicy::Propagate => Ok(Some(f64::NAN)),
            },
        }
    }
}

/// Group `records` into buckets of `bucket_width` and average each bucket.
///
/// Comma decimals, malformed records rejected. Use [`IntervalAggregator`]
/// for other conventions or policies.
pub fn group_by_interval<I>(
    records: I,
    bucket_width: f64,
) -> Result<Vec<SeriesPoint>, AggregationError>
where
    I: IntoIterator,
    I::Item: SensorRecord,
{
    Ok(IntervalAggregator::new(bucket_width)?
        .aggregate(records)?
        .points)
}
