//! Error types for loading, configuration and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the sensor CSV
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("Failed to read {path}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Tokenizer error from the CSV reader
    #[error("Malformed CSV")]
    Csv(#[from] csv::Error),

    /// Input has no header row once comments are stripped
    #[error("Input has no header row")]
    MissingHeader,

    /// A required column is absent from the header row
    #[error("Missing column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Columns present in the header
        available: Vec<String>,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::AggregatorConfig`]
    #[error("Invalid config {path}")]
    Json {
        /// Config file path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures while writing a chart
#[derive(Debug, Error)]
pub enum RenderError {
    /// Output could not be written
    #[error("Failed to write chart")]
    Io(#[from] std::io::Error),

    /// Series could not be serialized
    #[error("Failed to serialize series")]
    Json(#[from] serde_json::Error),
}
