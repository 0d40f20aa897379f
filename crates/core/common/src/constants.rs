//! Common constants used across the workspace
//!
//! Single source of truth for defaults that the loader, aggregator
//! and CLI must agree on.

// Aggregation defaults
/// Default bucket width in seconds
pub const DEFAULT_BUCKET_WIDTH_SECS: f64 = 10.0;

// Input file layout
/// Field delimiter of the sensor CSV export
pub const DEFAULT_DELIMITER: u8 = b';';
/// Lines starting with this byte are comments
pub const DEFAULT_COMMENT_PREFIX: u8 = b'#';
/// Header of the timestamp column (seconds since recording start)
pub const DEFAULT_TIME_COLUMN: &str = "Time";
/// Header of the measurement column
pub const DEFAULT_VALUE_COLUMN: &str = "CO2 emissions (estimated)";

// Chart defaults
/// Default chart width in pixels
pub const DEFAULT_CHART_WIDTH_PX: u32 = 960;
/// Default chart height in pixels
pub const DEFAULT_CHART_HEIGHT_PX: u32 = 400;
/// Default series label shown in the legend
pub const DEFAULT_SERIES_LABEL: &str = "Average CO2 Emissions";
/// Default series stroke colour
pub const DEFAULT_SERIES_COLOR: &str = "#2563eb";
/// Default series stroke width in pixels
pub const DEFAULT_SERIES_STROKE_PX: u32 = 2;
