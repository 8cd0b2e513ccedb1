//! Error types for batch processing.

use precip_common::TimeParseError;
use thiserror::Error;
use xmrg_parser::XmrgError;

/// Errors that can fail a single file-processing job.
///
/// These are always scoped to one file: the orchestrator logs them and moves
/// on, so no variant here ever aborts a batch.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decompress transport wrapper: {0}")]
    Decompression(String),

    #[error(transparent)]
    Format(#[from] XmrgError),

    #[error(transparent)]
    Time(#[from] TimeParseError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("worker failure: {0}")]
    Worker(String),
}

/// Result type for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;
