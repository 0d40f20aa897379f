//! Sensor CSV loader
//!
//! Reads the regional CSV export: `;` delimited, `#` comment lines anywhere
//! (including above the header), blank lines ignored, first remaining line
//! is the header. Only the time and measurement columns are decoded and
//! kept; numeric parsing is left to the aggregator.

use crate::config::LoaderConfig;
use crate::errors::{ConfigError, LoadError};
use common::RawRecord;
use csv::ReaderBuilder;
use rustc_hash::FxHashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: char = '\u{feff}';

/// Loads [`RawRecord`]s from sensor CSV exports
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    comment: Option<u8>,
    time_column: String,
    value_column: String,
}

impl CsvLoader {
    /// Create a loader for the given file layout
    pub fn new(config: &LoaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            comment: config.comment_byte()?,
            time_column: config.time_column.trim().to_string(),
            value_column: config.value_column.trim().to_string(),
        })
    }

    /// Load every record of the file at `path`
    pub fn load_path(&self, path: &Path) -> Result<Vec<RawRecord>, LoadError> {
        let content = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = self.load_reader(content.as_slice())?;
        info!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load every record of in-memory CSV text
    pub fn load_str(&self, content: &str) -> Result<Vec<RawRecord>, LoadError> {
        self.load_reader(content.as_bytes())
    }

    /// Load every record from `reader`.
    ///
    /// Only the header names and the two selected fields are decoded.
    /// Invalid UTF-8 in them is replaced with U+FFFD, so a badly encoded
    /// value reaches the aggregator as malformed text instead of failing
    /// the whole file.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> Result<Vec<RawRecord>, LoadError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(csv::Error::from)?;

        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .comment(self.comment)
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_slice());

        let headers: Vec<String> = csv_reader
            .byte_headers()?
            .iter()
            .map(|name| clean_header(&String::from_utf8_lossy(name)))
            .collect();
        if headers.is_empty() {
            return Err(LoadError::MissingHeader);
        }
        let columns = index_headers(&headers);
        let time_idx = column_index(&columns, &headers, &self.time_column)?;
        let value_idx = column_index(&columns, &headers, &self.value_column)?;
        debug!(
            "Header has {} columns; '{}' at {}, '{}' at {}",
            headers.len(),
            self.time_column,
            time_idx,
            self.value_column,
            value_idx
        );

        let mut lines = LineTracker::new(&input, self.comment);
        let mut records = Vec::new();
        for row in csv_reader.byte_records() {
            let row = row?;
            let start = row
                .position()
                .map_or(0, |pos| usize::try_from(pos.byte()).unwrap_or(usize::MAX));
            let line = lines.line_at(start);
            records.push(RawRecord::new(
                line,
                decode_field(row.get(time_idx)),
                decode_field(row.get(value_idx)),
            ));
        }
        Ok(records)
    }
}

fn column_index(
    columns: &FxHashMap<&str, usize>,
    headers: &[String],
    name: &str,
) -> Result<usize, LoadError> {
    columns
        .get(name)
        .copied()
        .ok_or_else(|| LoadError::MissingColumn {
            column: name.to_string(),
            available: headers.to_vec(),
        })
}

/// Missing fields become empty text
fn decode_field(field: Option<&[u8]>) -> String {
    field
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

/// Maps a record's starting byte offset to its 1-based source line.
///
/// The reader reports where it started looking for a record, which may be
/// on a blank or comment line above it; those lines are stepped over.
/// Offsets must be queried in ascending order.
struct LineTracker<'a> {
    input: &'a [u8],
    comment: Option<u8>,
    offset: usize,
    line: u64,
}

impl<'a> LineTracker<'a> {
    const fn new(input: &'a [u8], comment: Option<u8>) -> Self {
        Self {
            input,
            comment,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, start: usize) -> u64 {
        let start = start.min(self.input.len());
        self.advance_to(start);

        loop {
            let rest = &self.input[self.offset..];
            let end = rest.iter().position(|&b| b == b'\n');
            let current = &rest[..end.unwrap_or(rest.len())];
            let current = current.strip_suffix(b"\r").unwrap_or(current);
            let skipped = current.is_empty()
                || self.comment.is_some_and(|c| current.first() == Some(&c));
            match end {
                Some(len) if skipped => self.advance_to(self.offset + len + 1),
                _ => return self.line,
            }
        }
    }

    fn advance_to(&mut self, target: usize) {
        if target > self.offset {
            let newlines = self.input[self.offset..target]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u64;
            self.offset = target;
        }
    }
}

/// Header name -> position; the first occurrence of a duplicate wins
fn index_headers(headers: &[String]) -> FxHashMap<&str, usize> {
    let mut columns = FxHashMap::default();
    for (idx, name) in headers.iter().enumerate() {
        columns.entry(name.as_str()).or_insert(idx);
    }
    columns
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches(UTF8_BOM).trim().to_string()
}
