//! Projections for radar precipitation grids.
//!
//! Currently the single fixed earth model used by XMRG files: the HRAP
//! polar-stereographic grid.

pub mod error;
pub mod hrap;

pub use error::ProjectionError;
pub use hrap::{HrapCoord, HrapProjection};
