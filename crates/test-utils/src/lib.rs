//! Shared test utilities for the xmrg-processing workspace.
//!
//! Provides synthetic XMRG byte-stream builders and geometry fixtures so the
//! parser and pipeline test suites don't depend on archived data files.
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
