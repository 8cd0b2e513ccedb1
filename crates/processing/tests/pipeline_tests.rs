//! End-to-end batch tests over real files on disk.

use async_trait::async_trait;
use boundary_processor::{Boundary, XmrgResults, WEIGHTED_AVERAGE};
use processing::{ProcessingConfig, ResultsSink, XmrgProcessor};
use projection::{HrapCoord, HrapProjection};
use std::path::PathBuf;
use test_utils::fixtures::rectangle;
use test_utils::generators::{gzip_bytes, XmrgFileBuilder};
use tokio::sync::Mutex;

/// Sink that records every delivered result.
#[derive(Default)]
struct CollectSink {
    saved: Mutex<Vec<XmrgResults>>,
}

#[async_trait]
impl ResultsSink for CollectSink {
    async fn save(&self, results: &XmrgResults) -> anyhow::Result<()> {
        self.saved.lock().await.push(results.clone());
        Ok(())
    }
}

/// Sink that refuses everything.
struct FailingSink;

#[async_trait]
impl ResultsSink for FailingSink {
    async fn save(&self, _results: &XmrgResults) -> anyhow::Result<()> {
        anyhow::bail!("storage unavailable")
    }
}

/// A rectangle in cell geographic space (negative-west longitudes) that
/// fully covers the given grid window.
fn covering_boundary(origin_col: i32, origin_row: i32, columns: usize, rows: usize) -> Boundary {
    let projection = HrapProjection::new(origin_col, origin_row, columns, rows);
    let corners = [
        (origin_col as f64, origin_row as f64),
        (origin_col as f64 + columns as f64, origin_row as f64),
        (origin_col as f64, origin_row as f64 + rows as f64),
        (
            origin_col as f64 + columns as f64,
            origin_row as f64 + rows as f64,
        ),
    ];

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for (column, row) in corners {
        let geo = projection
            .grid_to_geo(HrapCoord::new(column, row))
            .expect("corner projects");
        min_x = min_x.min(-geo.longitude);
        max_x = max_x.max(-geo.longitude);
        min_y = min_y.min(geo.latitude);
        max_y = max_y.max(geo.latitude);
    }

    Boundary::new(
        "basin",
        rectangle(min_x - 0.05, min_y - 0.05, max_x + 0.05, max_y + 0.05),
    )
    .expect("boundary is non-degenerate")
}

fn test_config() -> ProcessingConfig {
    ProcessingConfig {
        worker_count: 2,
        ..ProcessingConfig::default()
    }
}

#[tokio::test]
async fn test_batch_isolates_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = Vec::new();
    for hour in ["01", "02"] {
        let path = dir.path().join(format!("xmrg01152020{hour}z"));
        std::fs::write(&path, XmrgFileBuilder::new().uniform(4, 4, 100).build()).unwrap();
        files.push(path);
    }
    let corrupt = dir.path().join("xmrg0115202003z");
    std::fs::write(
        &corrupt,
        XmrgFileBuilder::new()
            .uniform(4, 4, 100)
            .corrupt_row_marker(1)
            .build(),
    )
    .unwrap();
    files.push(corrupt);

    let processor =
        XmrgProcessor::new(test_config(), vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let sink = CollectSink::default();
    let summary = processor.process_files(files, &sink).await;

    assert_eq!(summary.files_submitted, 3);
    assert_eq!(summary.results_saved, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.files_skipped, 0);
    assert_eq!(summary.sink_failures, 0);

    let mut hours: Vec<u32> = sink
        .saved
        .lock()
        .await
        .iter()
        .map(|r| chrono::Timelike::hour(&r.collection_time()))
        .collect();
    hours.sort_unstable();
    assert_eq!(hours, vec![1, 2]);
}

#[tokio::test]
async fn test_gzip_unwrapped_and_working_file_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let compressed = dir.path().join("xmrg0115202012z.gz");
    std::fs::write(
        &compressed,
        gzip_bytes(&XmrgFileBuilder::new().uniform(4, 4, 100).build()),
    )
    .unwrap();

    let config = ProcessingConfig {
        delete_source_file: true,
        ..test_config()
    };
    let processor =
        XmrgProcessor::new(config, vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let sink = CollectSink::default();
    let summary = processor.process_files(vec![compressed.clone()], &sink).await;

    assert_eq!(summary.results_saved, 1);
    assert_eq!(summary.files_failed, 0);
    // Decoded working file is gone; the compressed original stays.
    assert!(!dir.path().join("xmrg0115202012z").exists());
    assert!(compressed.exists());
}

#[tokio::test]
async fn test_delete_compressed_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let compressed = dir.path().join("xmrg0115202012z.gz");
    std::fs::write(
        &compressed,
        gzip_bytes(&XmrgFileBuilder::new().uniform(4, 4, 100).build()),
    )
    .unwrap();

    let config = ProcessingConfig {
        delete_source_file: true,
        delete_compressed_source_file: true,
        ..test_config()
    };
    let processor =
        XmrgProcessor::new(config, vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let sink = CollectSink::default();
    let summary = processor.process_files(vec![compressed.clone()], &sink).await;

    assert_eq!(summary.results_saved, 1);
    assert!(!compressed.exists());
    assert!(!dir.path().join("xmrg0115202012z").exists());
}

#[tokio::test]
async fn test_staging_copies_and_missing_file_excluded() {
    let source_dir = tempfile::tempdir().unwrap();
    let working_dir = tempfile::tempdir().unwrap();

    let good = source_dir.path().join("xmrg0115202005z");
    std::fs::write(&good, XmrgFileBuilder::new().uniform(4, 4, 100).build()).unwrap();
    let missing: PathBuf = source_dir.path().join("xmrg0115202006z");

    let config = ProcessingConfig {
        source_file_working_directory: Some(working_dir.path().to_path_buf()),
        ..test_config()
    };
    let processor =
        XmrgProcessor::new(config, vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let sink = CollectSink::default();
    let summary = processor.process_files(vec![good.clone(), missing], &sink).await;

    assert_eq!(summary.files_submitted, 2);
    assert_eq!(summary.results_saved, 1);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.files_failed, 0);
    // The job ran against the staged copy; the archived original is intact.
    assert!(working_dir.path().join("xmrg0115202005z").exists());
    assert!(good.exists());
}

#[tokio::test]
async fn test_sink_failures_counted_without_aborting() {
    let dir = tempfile::tempdir().unwrap();
    let mut files = Vec::new();
    for hour in ["07", "08"] {
        let path = dir.path().join(format!("xmrg01152020{hour}z"));
        std::fs::write(&path, XmrgFileBuilder::new().uniform(4, 4, 100).build()).unwrap();
        files.push(path);
    }

    let processor =
        XmrgProcessor::new(test_config(), vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let summary = processor.process_files(files, &FailingSink).await;

    assert_eq!(summary.files_submitted, 2);
    assert_eq!(summary.sink_failures, 2);
    assert_eq!(summary.results_saved, 0);
    assert_eq!(summary.files_failed, 0);
}

#[tokio::test]
async fn test_uniform_rain_yields_positive_weighted_average() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xmrg0115202010z");
    // 250 hundredths of a millimeter per cell.
    std::fs::write(&path, XmrgFileBuilder::new().uniform(4, 4, 250).build()).unwrap();

    let processor =
        XmrgProcessor::new(test_config(), vec![covering_boundary(367, 263, 4, 4)]).unwrap();
    let sink = CollectSink::default();
    let summary = processor.process_files(vec![path], &sink).await;
    assert_eq!(summary.results_saved, 1);

    let saved = sink.saved.lock().await;
    let average = saved[0]
        .boundary_result("basin", WEIGHTED_AVERAGE)
        .expect("basin has a weighted average");
    // Boundary padding exceeds the cell union, so the area-weighted value
    // sits strictly between zero and the uniform 2.5 mm.
    assert!(average > 0.0 && average <= 2.5 + 1e-9, "average = {average}");
}
