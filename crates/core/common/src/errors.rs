//! Error types for the aggregation pass

use crate::decimal::ParseDecimalError;
use std::fmt;
use thiserror::Error;

/// Record field a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Timestamp column
    Timestamp,
    /// Measurement column
    Measurement,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => write!(f, "timestamp"),
            Self::Measurement => write!(f, "measurement"),
        }
    }
}

/// Where a record sits: its position in the input and, when known, its source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordLabel {
    /// Zero-based position of the record in the input sequence
    pub position: usize,
    /// 1-based line in the source file
    pub line: Option<u64>,
}

impl RecordLabel {
    /// Label a record
    #[must_use]
    pub const fn new(position: usize, line: Option<u64>) -> Self {
        Self { position, line }
    }
}

impl fmt::Display for RecordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {} (record {})", line, self.position),
            None => write!(f, "Record {}", self.position),
        }
    }
}

fn record_label(position: &usize, line: &Option<u64>) -> RecordLabel {
    RecordLabel::new(*position, *line)
}

/// Aggregation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// Caller supplied an unusable argument (e.g. non-positive bucket width)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A record field could not be read as a number
    #[error("{}: invalid {field}", record_label(.position, .line))]
    Parse {
        /// Zero-based position of the record in the input sequence
        position: usize,
        /// Source line of the record, when the record knows it
        line: Option<u64>,
        /// Which field failed
        field: Field,
        /// Underlying decimal error
        #[source]
        source: ParseDecimalError,
    },

    /// Timestamp parsed but its bucket index does not fit in an `i64`
    #[error(
        "{}: timestamp {timestamp} is out of range for bucket width {width}",
        record_label(.position, .line)
    )]
    TimestampOutOfRange {
        /// Zero-based position of the record in the input sequence
        position: usize,
        /// Source line of the record, when the record knows it
        line: Option<u64>,
        /// Parsed timestamp
        timestamp: f64,
        /// Bucket width in use
        width: f64,
    },
}

impl AggregationError {
    /// Zero-based record position, if the error is about a single record
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Parse { position, .. } | Self::TimestampOutOfRange { position, .. } => {
                Some(*position)
            }
        }
    }

    /// Source line of the offending record, if known
    #[must_use]
    pub const fn line(&self) -> Option<u64> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Parse { line, .. } | Self::TimestampOutOfRange { line, .. } => *line,
        }
    }
}
