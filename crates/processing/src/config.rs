//! Configuration for the batch processor.

use crate::error::{ProcessingError, Result};
use precip_common::BoundingBox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel worker jobs.
    pub worker_count: usize,

    /// Coarse geographic window restricting materialized cells to the area
    /// of interest. `None` processes the full grid of every file.
    pub bounding_box: Option<BoundingBox>,

    /// Emit every cell value, not just positive precipitation.
    pub save_all_precip_values: bool,

    /// Unit multiplier applied to raw cell values (XMRG stores hundredths
    /// of millimeters).
    pub data_multiplier: f64,

    /// When set, each source file is copied here before decoding so archival
    /// storage stays isolated from working files.
    pub source_file_working_directory: Option<PathBuf>,

    /// Delete the decoded working file after a job completes.
    pub delete_source_file: bool,

    /// Delete the original compressed file after a job completes.
    pub delete_compressed_source_file: bool,

    /// Retain intersected cell pieces per boundary for diagnostics.
    pub keep_boundary_cells: bool,

    /// Hour assigned to daily-accumulation (`24hrxmrg`) files, which carry
    /// no hour digits in their names.
    pub daily_default_hour: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            bounding_box: None,
            save_all_precip_values: false,
            data_multiplier: 0.01,
            source_file_working_directory: None,
            delete_source_file: false,
            delete_compressed_source_file: false,
            keep_boundary_cells: false,
            daily_default_hour: 0,
        }
    }
}

impl ProcessingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(ProcessingError::InvalidConfig(
                "worker_count must be > 0".to_string(),
            ));
        }
        if !self.data_multiplier.is_finite() || self.data_multiplier <= 0.0 {
            return Err(ProcessingError::InvalidConfig(
                "data_multiplier must be a positive number".to_string(),
            ));
        }
        if self.daily_default_hour > 23 {
            return Err(ProcessingError::InvalidConfig(
                "daily_default_hour must be 0-23".to_string(),
            ));
        }
        Ok(())
    }
}
