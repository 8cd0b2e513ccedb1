//! Processor service configuration.

use anyhow::{Context, Result};
use boundary_processor::Boundary;
use geo::{LineString, Polygon};
use processing::ProcessingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level service configuration, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorServiceConfig {
    /// Directory scanned for XMRG files.
    pub input_directory: PathBuf,

    /// Where results go.
    #[serde(default)]
    pub sink: SinkConfig,

    /// Named boundary polygons to aggregate over.
    pub boundaries: Vec<BoundaryConfig>,

    /// Batch processing settings.
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Result sink selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Log each boundary result (dry runs).
    #[default]
    Log,
    /// Append one JSON object per file to a JSON-lines file.
    JsonLines { path: PathBuf },
}

/// One named boundary, as a closed ring of `[longitude, latitude]` pairs.
/// Longitudes are standard negative-west values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub name: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl ProcessorServiceConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.boundaries.is_empty() {
            anyhow::bail!("at least one boundary must be configured");
        }
        self.processing.validate()?;
        Ok(())
    }

    /// Build the runtime boundary set from the configured rings.
    pub fn build_boundaries(&self) -> Result<Vec<Boundary>> {
        self.boundaries
            .iter()
            .map(|b| {
                let ring: Vec<(f64, f64)> =
                    b.coordinates.iter().map(|c| (c[0], c[1])).collect();
                let polygon = Polygon::new(LineString::from(ring), vec![]);
                Boundary::new(&b.name, polygon)
                    .with_context(|| format!("boundary '{}' is invalid", b.name))
            })
            .collect()
    }
}
