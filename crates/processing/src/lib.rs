//! Concurrent XMRG batch processing.
//!
//! Ties the decoder, materializer and boundary aggregation together behind a
//! single [`XmrgProcessor`]: files fan out to a bounded worker pool, finished
//! results fan in through one channel and are handed to a [`ResultsSink`]
//! one at a time.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use config::ProcessingConfig;
pub use error::{ProcessingError, Result};
pub use pipeline::{RunSummary, XmrgProcessor};
pub use sink::{JsonLinesSink, LogSink, ResultsSink};
