//! JSON series renderer
//!
//! Emits `[{"intervalStart": .., "averageValue": .., "samples": ..}, ..]`.
//! Non-finite values (legacy `NaN` buckets) serialize as `null`.

use super::ChartRenderer;
use crate::errors::RenderError;
use crate::state::ChartState;
use std::io::Write;

/// Writes the series as a JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSeries {
    pretty: bool,
}

impl JsonSeries {
    /// Single-line output
    #[must_use]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented output
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ChartRenderer for JsonSeries {
    fn render(&self, state: &ChartState, out: &mut dyn Write) -> Result<(), RenderError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, state.series())?;
        } else {
            serde_json::to_writer(&mut *out, state.series())?;
        }
        writeln!(out)?;
        Ok(())
    }
}
