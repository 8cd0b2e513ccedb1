//! The batch orchestrator: fan out decode+aggregate jobs, fan in results.

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::sink::ResultsSink;
use boundary_processor::{aggregate, materialize_cells, Boundary, MaterializeOptions, XmrgResults};
use precip_common::collection_date_from_filename;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};
use xmrg_parser::XmrgGrid;

/// Counters describing one finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files in the submitted list.
    pub files_submitted: usize,
    /// Files excluded before dispatch (staging copy failed).
    pub files_skipped: usize,
    /// Results delivered to the sink.
    pub results_saved: usize,
    /// Jobs that failed in decode/aggregate.
    pub files_failed: usize,
    /// Results dropped because the sink refused them.
    pub sink_failures: usize,
}

/// Outcome of one file job, delivered over the results channel.
struct FileOutcome {
    path: PathBuf,
    result: Result<XmrgResults>,
}

/// Batch processor for XMRG files.
///
/// Boundaries are loaded once and shared read-only across all jobs; every
/// other piece of state is job-local.
pub struct XmrgProcessor {
    config: Arc<ProcessingConfig>,
    boundaries: Arc<Vec<Boundary>>,
}

impl XmrgProcessor {
    pub fn new(config: ProcessingConfig, boundaries: Vec<Boundary>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            boundaries: Arc::new(boundaries),
        })
    }

    /// Process a batch of files, delivering results to `sink` as jobs
    /// complete (not in submission order).
    ///
    /// Jobs run on a pool bounded by `worker_count`; completed results flow
    /// through a bounded channel to this single consumer loop, so the sink
    /// sees at most one `save` call at a time. A failure in one file never
    /// aborts the rest of the batch.
    pub async fn process_files(
        &self,
        files: Vec<PathBuf>,
        sink: &dyn ResultsSink,
    ) -> RunSummary {
        let mut summary = RunSummary {
            files_submitted: files.len(),
            ..RunSummary::default()
        };

        let worker_count = self.config.worker_count;
        let (tx, mut rx) = mpsc::channel::<FileOutcome>(worker_count * 2);
        let semaphore = Arc::new(Semaphore::new(worker_count));
        let config = self.config.clone();
        let boundaries = self.boundaries.clone();

        let dispatcher = tokio::spawn(async move {
            let mut skipped = 0usize;

            for path in files {
                let staged = match stage_file(
                    &path,
                    config.source_file_working_directory.as_deref(),
                )
                .await
                {
                    Ok(staged) => staged,
                    Err(error) => {
                        warn!(file = %path.display(), %error, "staging failed, file excluded");
                        skipped += 1;
                        continue;
                    }
                };

                let permit = match semaphore.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let tx = tx.clone();
                let config = config.clone();
                let boundaries = boundaries.clone();

                tokio::spawn(async move {
                    let job_path = staged.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        process_one_file(&config, &boundaries, &staged)
                    })
                    .await;
                    drop(permit);

                    let result = match joined {
                        Ok(result) => result,
                        Err(join_error) => Err(ProcessingError::Worker(join_error.to_string())),
                    };
                    // Receiver dropping means the run was abandoned; nothing
                    // left to do with this outcome.
                    let _ = tx
                        .send(FileOutcome {
                            path: job_path,
                            result,
                        })
                        .await;
                });
            }

            skipped
        });

        while let Some(outcome) = rx.recv().await {
            match outcome.result {
                Ok(results) => match sink.save(&results).await {
                    Ok(()) => summary.results_saved += 1,
                    Err(error) => {
                        warn!(file = %outcome.path.display(), %error, "sink rejected results");
                        summary.sink_failures += 1;
                    }
                },
                Err(error) => {
                    warn!(file = %outcome.path.display(), %error, "file processing failed");
                    summary.files_failed += 1;
                }
            }
        }

        summary.files_skipped = match dispatcher.await {
            Ok(skipped) => skipped,
            Err(join_error) => {
                warn!(%join_error, "dispatcher task failed");
                0
            }
        };

        info!(
            submitted = summary.files_submitted,
            saved = summary.results_saved,
            failed = summary.files_failed,
            skipped = summary.files_skipped,
            "batch finished"
        );
        summary
    }
}

/// Copy a source file into the working directory, when one is configured.
async fn stage_file(path: &Path, working_directory: Option<&Path>) -> std::io::Result<PathBuf> {
    let Some(dir) = working_directory else {
        return Ok(path.to_path_buf());
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let staged = dir.join(file_name);
    tokio::fs::copy(path, &staged).await?;
    debug!(from = %path.display(), to = %staged.display(), "staged source file");
    Ok(staged)
}

/// One complete job: unwrap transport, decode, materialize, aggregate,
/// apply the delete policy. Runs on a blocking worker.
fn process_one_file(
    config: &ProcessingConfig,
    boundaries: &[Boundary],
    path: &Path,
) -> Result<XmrgResults> {
    let name = path.to_string_lossy();
    let collection_time = collection_date_from_filename(&name, config.daily_default_hour)?;

    let (working_path, compressed_path) = unwrap_transport(path)?;

    let data = std::fs::read(&working_path)?;
    let grid = XmrgGrid::parse(&data)?;
    debug!(
        file = %working_path.display(),
        columns = grid.column_count(),
        rows = grid.row_count(),
        swapped = grid.header.byte_swapped,
        "decoded grid"
    );

    let options = MaterializeOptions {
        bounding_box: config.bounding_box,
        data_multiplier: config.data_multiplier,
        keep_all_values: config.save_all_precip_values,
    };
    let cells = materialize_cells(&grid, &options);
    let results = aggregate(&cells, boundaries, collection_time, config.keep_boundary_cells);

    clean_up(config, &working_path, compressed_path.as_deref());

    Ok(results)
}

/// Decompress a gzip-wrapped file next to itself and return
/// `(working_file, original_compressed_file)`. Non-gz files are used as-is.
fn unwrap_transport(path: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    if path.extension().map(|e| e == "gz") != Some(true) {
        return Ok((path.to_path_buf(), None));
    }

    let working = path.with_extension("");
    let compressed = std::fs::File::open(path)?;
    let mut decoder = flate2::read::GzDecoder::new(compressed);
    let mut contents = Vec::new();
    decoder
        .read_to_end(&mut contents)
        .map_err(|e| ProcessingError::Decompression(e.to_string()))?;
    std::fs::write(&working, contents)?;

    Ok((working, Some(path.to_path_buf())))
}

/// Apply the delete policy. Deletion is best-effort: failures are logged and
/// never fail the job.
fn clean_up(config: &ProcessingConfig, working_path: &Path, compressed_path: Option<&Path>) {
    if config.delete_source_file {
        if let Err(error) = std::fs::remove_file(working_path) {
            warn!(file = %working_path.display(), %error, "failed to delete working file");
        }
    }
    if config.delete_compressed_source_file {
        if let Some(compressed) = compressed_path {
            if let Err(error) = std::fs::remove_file(compressed) {
                warn!(file = %compressed.display(), %error, "failed to delete compressed file");
            }
        }
    }
}
