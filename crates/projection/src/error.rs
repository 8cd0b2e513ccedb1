//! Error types for projection math.

use thiserror::Error;

/// Errors from the closed-form HRAP transform.
///
/// Not expected in normal operation; an out-of-domain result indicates a
/// corrupt grid coordinate and the affected cell should be skipped rather
/// than letting a NaN propagate.
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("asin argument {value} out of range projecting HRAP ({column}, {row})")]
    OutOfDomain {
        column: f64,
        row: f64,
        value: f64,
    },
}
