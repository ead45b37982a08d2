// hydrosim Feeder - Local queue/table harness
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # hydrosim Feeder
//!
//! Generates synthetic water level readings, pushes each one onto an
//! in-process queue and drains the queue into a table store.
//!
//! ## Usage
//!
//! ```bash
//! # One week into memory, dump the table afterwards
//! hydrosim-feeder --days 7 --table-out table.json
//!
//! # Custom epoch, also export the stored series as CSV
//! hydrosim-feeder --days 30 --epoch 2020-01-01T00:00:00Z --csv-out levels.csv
//! ```

mod pipeline;
mod queue;
mod table;

use chrono::{DateTime, Utc};
use clap::Parser;
use hydrosim::{GenerationRequest, GeneratorConfig, Sample, Series};
use pipeline::{run_pipeline, PipelineConfig, PipelineError};
use std::path::PathBuf;
use std::process::ExitCode;
use table::{row_key, MemoryTableStore, TableStore};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// hydrosim queue/table feeder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Days of hourly samples to generate
    #[arg(short, long, default_value = "7", allow_negative_numbers = true)]
    days: f64,

    /// Reference epoch for the first sample (RFC 3339)
    #[arg(short, long, value_parser = parse_epoch)]
    epoch: Option<DateTime<Utc>>,

    /// Maximum pending queue messages
    #[arg(short, long, default_value = "64")]
    queue_capacity: usize,

    /// Partition key for stored entities
    #[arg(short, long, default_value = "waterlevel")]
    partition: String,

    /// Write the table contents to this JSON file
    #[arg(long)]
    table_out: Option<PathBuf>,

    /// Write the stored series to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_epoch(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

fn log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::from_default_env().add_directive(log_level(&args.log_level).into())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("hydrosim feeder v{}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), PipelineError> {
    let mut generator = GeneratorConfig::new();
    if let Some(epoch) = args.epoch {
        generator = generator.with_reference_epoch(epoch);
    }
    let request = GenerationRequest::new(args.days);
    let partition = args.partition;

    let config = PipelineConfig {
        generator,
        request,
        queue_capacity: args.queue_capacity,
        partition_key: partition.clone(),
        ..Default::default()
    };

    let (report, table) = run_pipeline(config, MemoryTableStore::new("waterlevels")).await?;
    if table.is_empty() {
        warn!("No entities stored");
    }
    info!(
        "Table '{}' holds {} entities ({} rejected)",
        table.name(),
        report.inserted,
        report.rejected
    );

    if let Some(first) = table.get_entity(&partition, &row_key(0)) {
        debug!("First stored level {} at {}", first.water_level, first.date);
    }

    if let Some(path) = &args.csv_out {
        let mut series = stored_series(&table, &partition);
        series.metadata.duration_days = Some(request.duration_days);
        series.to_csv(path)?;
        info!("Series written to {}", path.display());
    }

    if let Some(path) = &args.table_out {
        table.to_json_file(path)?;
        info!("Table written to {}", path.display());
    }

    Ok(())
}

/// Rebuild the series held in one partition, in row key order.
fn stored_series<S: TableStore>(table: &S, partition: &str) -> Series {
    let samples = table
        .query_partition(partition)
        .into_iter()
        .map(|entity| Sample::new(entity.date, entity.water_level))
        .collect();
    Series::new(samples).with_name(partition)
}
