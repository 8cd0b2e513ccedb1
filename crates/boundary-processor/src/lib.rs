//! Boundary aggregation for decoded XMRG precipitation grids.
//!
//! Turns a decoded grid into geographic cell polygons and reduces them over
//! named boundary polygons (watersheds) into area-weighted averages.

pub mod aggregate;
pub mod boundary;
pub mod error;
pub mod materialize;
pub mod results;

pub use aggregate::aggregate;
pub use boundary::Boundary;
pub use error::AggregationError;
pub use materialize::{materialize_cells, GeoCell, MaterializeOptions};
pub use results::{XmrgResults, WEIGHTED_AVERAGE};
