//! XMRG batch processor service.
//!
//! Scans a directory of XMRG radar precipitation files, decodes them, and
//! aggregates area-weighted averages over configured boundary polygons.

mod config;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Parser;
use precip_common::{collection_date_from_filename, file_list_for_range};
use processing::{JsonLinesSink, LogSink, ResultsSink, XmrgProcessor};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

use config::{ProcessorServiceConfig, SinkConfig};

#[derive(Parser, Debug)]
#[command(name = "processor")]
#[command(about = "XMRG precipitation batch processor")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/xmrg-processor/config.yaml")]
    config: String,

    /// Only process the hourly files ending at this time (YYYY-MM-DDTHH:00:00)
    #[arg(long, requires = "hours")]
    end_time: Option<String>,

    /// Number of hourly files before --end-time to process
    #[arg(long)]
    hours: Option<u32>,

    /// Filename extension used with --end-time/--hours
    #[arg(long, default_value = "gz")]
    extension: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting XMRG batch processor");

    let config = ProcessorServiceConfig::from_yaml(args.config.as_ref())?;
    let boundaries = config.build_boundaries()?;
    info!(
        input = %config.input_directory.display(),
        boundaries = boundaries.len(),
        workers = config.processing.worker_count,
        "Loaded configuration"
    );

    let files = match (&args.end_time, args.hours) {
        (Some(end_time), Some(hours)) => {
            let end = NaiveDateTime::parse_from_str(end_time, "%Y-%m-%dT%H:%M:%S")?;
            hourly_range_files(&config, end, hours, &args.extension)
        }
        _ => scan_input_directory(&config),
    };

    if files.is_empty() {
        warn!("No XMRG files to process");
        return Ok(());
    }
    info!(files = files.len(), "Submitting batch");

    let sink: Box<dyn ResultsSink> = match &config.sink {
        SinkConfig::Log => Box::new(LogSink),
        SinkConfig::JsonLines { path } => Box::new(JsonLinesSink::create(path).await?),
    };

    let processor = XmrgProcessor::new(config.processing.clone(), boundaries)?;
    let summary = processor.process_files(files, sink.as_ref()).await;

    info!(
        submitted = summary.files_submitted,
        saved = summary.results_saved,
        failed = summary.files_failed,
        skipped = summary.files_skipped,
        sink_failures = summary.sink_failures,
        "Batch complete"
    );

    if summary.results_saved == 0 && summary.files_submitted > 0 {
        anyhow::bail!("no files were processed successfully");
    }
    Ok(())
}

/// All files under the input directory whose names carry an XMRG timestamp.
fn scan_input_directory(config: &ProcessorServiceConfig) -> Vec<PathBuf> {
    let daily_hour = config.processing.daily_default_hour;
    let mut files: Vec<PathBuf> = WalkDir::new(&config.input_directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            collection_date_from_filename(&entry.file_name().to_string_lossy(), daily_hour)
                .is_ok()
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// The expected hourly filenames for a time range, restricted to those that
/// actually exist under the input directory.
fn hourly_range_files(
    config: &ProcessorServiceConfig,
    end: NaiveDateTime,
    hours: u32,
    extension: &str,
) -> Vec<PathBuf> {
    file_list_for_range(end, hours, extension)
        .into_iter()
        .map(|name| config.input_directory.join(name))
        .filter(|path| {
            if path.exists() {
                true
            } else {
                warn!(file = %path.display(), "expected file is missing");
                false
            }
        })
        .collect()
}
