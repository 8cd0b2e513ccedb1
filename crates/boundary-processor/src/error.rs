//! Error types for boundary aggregation.

use thiserror::Error;

/// Errors that can occur while aggregating a grid over boundaries.
#[derive(Error, Debug)]
pub enum AggregationError {
    /// The boundary polygon has no usable planar area, so area weights are
    /// undefined for it.
    #[error("boundary '{0}' has degenerate geometry (non-positive area)")]
    DegenerateBoundary(String),
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregationError>;
