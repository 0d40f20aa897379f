//! CO2 aggregator configuration

use crate::aggregators::MalformedPolicy;
use crate::errors::ConfigError;
use crate::render::ChartConfig;
use common::constants::{
    DEFAULT_BUCKET_WIDTH_SECS, DEFAULT_COMMENT_PREFIX, DEFAULT_DELIMITER, DEFAULT_TIME_COLUMN,
    DEFAULT_VALUE_COLUMN,
};
use common::{BucketWidth, DecimalSeparator};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// CO2 aggregator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Bucket width in seconds
    pub bucket_width_secs: f64,

    /// Decimal convention of the numeric fields
    pub decimal_separator: DecimalSeparator,

    /// Handling of records whose fields are not numbers
    pub on_malformed: MalformedPolicy,

    /// Input file layout
    pub loader: LoaderConfig,

    /// Chart appearance
    pub chart: ChartConfig,
}

/// Input file layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter (single ASCII character)
    pub delimiter: char,

    /// Lines starting with this character are dropped; `None` disables comments
    pub comment_prefix: Option<char>,

    /// Header of the timestamp column
    pub time_column: String,

    /// Header of the measurement column
    pub value_column: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            bucket_width_secs: DEFAULT_BUCKET_WIDTH_SECS,
            decimal_separator: DecimalSeparator::Comma,
            on_malformed: MalformedPolicy::Skip,
            loader: LoaderConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: char::from(DEFAULT_DELIMITER),
            comment_prefix: Some(char::from(DEFAULT_COMMENT_PREFIX)),
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        BucketWidth::new(self.bucket_width_secs)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.loader.validate()
    }
}

impl LoaderConfig {
    /// Delimiter and comment prefix must be single ASCII bytes
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        self.comment_byte()?;
        if self.time_column.trim().is_empty() || self.value_column.trim().is_empty() {
            return Err(ConfigError::Invalid("column names must not be empty".to_string()));
        }
        if self.time_column == self.value_column {
            return Err(ConfigError::Invalid(format!(
                "time and value columns are both '{}'",
                self.time_column
            )));
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        ascii_byte(self.delimiter, "delimiter")
    }

    /// Comment prefix as the byte the CSV reader expects
    pub fn comment_byte(&self) -> Result<Option<u8>, ConfigError> {
        self.comment_prefix
            .map(|c| ascii_byte(c, "comment prefix"))
            .transpose()
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8, ConfigError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ConfigError::Invalid(format!("{what} '{c}' is not a single ASCII character")))
}
