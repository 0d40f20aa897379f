//! Decimal number parsing for regional CSV exports
//!
//! Sensor exports from some locales write `12,5` instead of `12.5`.
//! All numeric text in the pipeline goes through [`DecimalSeparator::parse`]
//! so the convention can be swapped without touching aggregation logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Decimal separator used by the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `12,5`
    #[default]
    Comma,
    /// `12.5`
    Point,
}

/// Failure to turn text into a finite number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal '{input}': {reason}")]
pub struct ParseDecimalError {
    /// Offending text as found in the input
    pub input: String,
    /// Short reason
    pub reason: &'static str,
}

impl ParseDecimalError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl DecimalSeparator {
    /// Parse `text` as a finite `f64` under this convention.
    ///
    /// Surrounding whitespace is ignored. With [`DecimalSeparator::Comma`]
    /// at most one comma is accepted and it is read as the decimal point.
    /// `NaN` and infinities are rejected even though `f64::from_str` accepts them.
    pub fn parse(&self, text: &str) -> Result<f64, ParseDecimalError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseDecimalError::new(text, "empty field"));
        }

        let value = match self {
            Self::Comma => {
                if trimmed.matches(',').count() > 1 {
                    return Err(ParseDecimalError::new(text, "more than one decimal comma"));
                }
                trimmed.replacen(',', ".", 1).parse::<f64>()
            }
            Self::Point => trimmed.parse::<f64>(),
        }
        .map_err(|_| ParseDecimalError::new(text, "not a number"))?;

        if !value.is_finite() {
            return Err(ParseDecimalError::new(text, "not a finite number"));
        }
        Ok(value)
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comma => write!(f, "comma"),
            Self::Point => write!(f, "point"),
        }
    }
}
