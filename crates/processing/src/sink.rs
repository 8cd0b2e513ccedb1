//! Result sinks: anything that can consume one `XmrgResults` at a time.
//!
//! The orchestrator guarantees at most one in-flight `save` call, so sinks
//! only need to serialize their own side effects, not tolerate reentrancy.

use async_trait::async_trait;
use boundary_processor::XmrgResults;
use serde_json::json;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

/// Capability interface for result consumers.
///
/// Implementations are selected by configuration, not inheritance: a
/// persistence-backed sink, a diagnostic file dump, and so on.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    async fn save(&self, results: &XmrgResults) -> anyhow::Result<()>;
}

/// Sink that logs each boundary result. Useful for dry runs.
pub struct LogSink;

#[async_trait]
impl ResultsSink for LogSink {
    async fn save(&self, results: &XmrgResults) -> anyhow::Result<()> {
        for (boundary, values) in results.boundary_results() {
            info!(
                collection_time = %results.collection_time(),
                boundary,
                ?values,
                "boundary result"
            );
        }
        Ok(())
    }
}

/// Sink that appends one JSON object per file to a JSON-lines file,
/// including intersected cell rings when the run retained them.
pub struct JsonLinesSink {
    file: Mutex<File>,
}

impl JsonLinesSink {
    pub async fn create(path: &Path) -> anyhow::Result<Self> {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl ResultsSink for JsonLinesSink {
    async fn save(&self, results: &XmrgResults) -> anyhow::Result<()> {
        let mut boundaries = serde_json::Map::new();
        for (name, values) in results.boundary_results() {
            let mut entry = serde_json::Map::new();
            for (result_type, value) in values {
                entry.insert(result_type.clone(), json!(value));
            }
            if let Some(cells) = results.boundary_cells(name) {
                let rings: Vec<_> = cells
                    .iter()
                    .map(|cell| {
                        let ring: Vec<[f64; 2]> = cell
                            .polygon
                            .exterior()
                            .coords()
                            .map(|c| [c.x, c.y])
                            .collect();
                        json!({ "value": cell.precipitation, "ring": ring })
                    })
                    .collect();
                entry.insert("cells".to_string(), json!(rings));
            }
            boundaries.insert(name.to_string(), serde_json::Value::Object(entry));
        }

        let record = json!({
            "collection_time": results.collection_time().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "boundaries": boundaries,
        });

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
