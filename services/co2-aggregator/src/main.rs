//! CO2 Aggregator - command-line front end
//!
//! Loads a sensor CSV export, averages the CO2 measurement over fixed-width
//! time buckets and writes the series as an SVG line chart or JSON.

use anyhow::{Context, Result};
use clap::Parser;
use co2_aggregator::{
    refresh_chart, render_chart, AggregatorConfig, ChartState, MalformedPolicy, OutputFormat,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "co2-aggregator";

#[derive(Parser, Debug)]
#[command(name = "co2-aggregator")]
#[command(about = "Average sensor CO2 readings over time buckets and chart them")]
#[command(version)]
struct Cli {
    /// Sensor CSV export (`;` delimited, `#` comments)
    input: PathBuf,

    /// JSON configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Bucket width in seconds
    #[arg(long, short = 'w')]
    bucket_width: Option<f64>,

    /// Output format; inferred from --output when omitted, svg otherwise
    #[arg(long, short = 'f')]
    format: Option<OutputFormat>,

    /// Output file; stdout when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Malformed-record policy: reject, skip or propagate
    #[arg(long)]
    on_malformed: Option<MalformedPolicy>,

    /// Header of the timestamp column
    #[arg(long)]
    time_column: Option<String>,

    /// Header of the measurement column
    #[arg(long)]
    value_column: Option<String>,

    /// Chart title
    #[arg(long)]
    title: Option<String>,
}

impl Cli {
    /// Defaults, then config file, then flags
    fn resolve_config(&self) -> Result<AggregatorConfig> {
        let mut config = match &self.config {
            Some(path) => AggregatorConfig::from_json_file(path)?,
            None => AggregatorConfig::default(),
        };

        if let Some(width) = self.bucket_width {
            config.bucket_width_secs = width;
        }
        if let Some(policy) = self.on_malformed {
            config.on_malformed = policy;
        }
        if let Some(column) = &self.time_column {
            config.loader.time_column.clone_from(column);
        }
        if let Some(column) = &self.value_column {
            config.loader.value_column.clone_from(column);
        }
        if let Some(title) = &self.title {
            config.chart.title = Some(title.clone());
        }

        config.validate()?;
        Ok(config)
    }

    fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or_default()
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));

    let config = cli.resolve_config()?;
    let format = cli.output_format();

    let mut state = ChartState::new();
    refresh_chart(&config, &cli.input, &mut state)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            render_chart(&config, format, &state, &mut out)?;
            out.flush()?;
            info!("Wrote {} chart to {}", format, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            render_chart(&config, format, &state, &mut out)?;
        }
    }

    Ok(())
}

/// Initialize tracing with environment filter; logs go to stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", SERVICE_NAME.replace('-', "_")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();
}
