//! Factory patterns for generating test data

use common::RawRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Format `value` the way the regional export does (`12,5`)
pub fn format_decimal_comma(value: f64) -> String {
    format!("{value}").replace('.', ",")
}

/// Factory for sensor CSV exports with customization
#[derive(Debug, Clone)]
pub struct SensorExportFactory {
    delimiter: char,
    time_column: String,
    value_column: String,
    preamble: Vec<String>,
}

impl Default for SensorExportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorExportFactory {
    pub fn new() -> Self {
        Self {
            delimiter: ';',
            time_column: "Time".to_string(),
            value_column: "CO2 emissions (estimated)".to_string(),
            preamble: vec!["# Exported by SensorLogger 2.4".to_string()],
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_columns(mut self, time: impl Into<String>, value: impl Into<String>) -> Self {
        self.time_column = time.into();
        self.value_column = value.into();
        self
    }

    /// Replace the comment lines written above the header
    pub fn with_preamble(mut self, lines: &[&str]) -> Self {
        self.preamble = lines.iter().map(|l| format!("# {l}")).collect();
        self
    }

    /// CSV text for the given `(time, value)` readings
    pub fn build_csv(&self, readings: &[(f64, f64)]) -> String {
        let rows: Vec<(String, String)> = readings
            .iter()
            .map(|(t, v)| (format_decimal_comma(*t), format_decimal_comma(*v)))
            .collect();
        self.build_csv_raw(&rows)
    }

    /// CSV text with verbatim field contents (for malformed input)
    pub fn build_csv_raw(&self, rows: &[(String, String)]) -> String {
        let d = self.delimiter;
        let mut csv = String::new();
        for line in &self.preamble {
            csv.push_str(line);
            csv.push('\n');
        }
        csv.push_str(&format!("{}{d}{}{d}Power (W)\n", self.time_column, self.value_column));
        for (time, value) in rows {
            csv.push_str(&format!("{time}{d}{value}{d}0\n"));
        }
        csv
    }
}

/// Factory for reading sequences
pub struct ReadingFactory {
    rng: StdRng,
}

impl ReadingFactory {
    /// Deterministic factory
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `count` readings every `step` seconds with values in `[low, high)`
    pub fn regular(&mut self, count: usize, step: f64, low: f64, high: f64) -> Vec<(f64, f64)> {
        (0..count)
            .map(|i| (i as f64 * step, self.rng.gen_range(low..high)))
            .collect()
    }

    /// `count` readings at random times in `[0, max_time)`, unsorted
    pub fn scattered(&mut self, count: usize, max_time: f64, low: f64, high: f64) -> Vec<(f64, f64)> {
        (0..count)
            .map(|_| (self.rng.gen_range(0.0..max_time), self.rng.gen_range(low..high)))
            .collect()
    }
}

/// Turn readings into records as the loader would produce them
pub fn to_raw_records(readings: &[(f64, f64)]) -> Vec<RawRecord> {
    readings
        .iter()
        .enumerate()
        .map(|(i, (t, v))| {
            // header is line 1
            RawRecord::new(i as u64 + 2, format_decimal_comma(*t), format_decimal_comma(*v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_decimal_comma() {
        assert_eq!(format_decimal_comma(12.5), "12,5");
        assert_eq!(format_decimal_comma(400.0), "400");
        assert_eq!(format_decimal_comma(-0.25), "-0,25");
    }

    #[test]
    fn test_build_csv() {
        let csv = SensorExportFactory::new()
            .with_preamble(&["Device: test"])
            .build_csv(&[(0.0, 400.5), (2.5, 401.0)]);
        assert_eq!(
            csv,
            "# Device: test\nTime;CO2 emissions (estimated);Power (W)\n0;400,5;0\n2,5;401;0\n"
        );
    }

    #[test]
    fn test_seeded_factory_is_deterministic() {
        let a = ReadingFactory::seeded(7).scattered(10, 100.0, 400.0, 800.0);
        let b = ReadingFactory::seeded(7).scattered(10, 100.0, 400.0, 800.0);
        assert_eq!(a, b);
    }
}
