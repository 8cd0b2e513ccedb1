//! Common types and utilities shared across the xmrg-processing workspace.

pub mod bbox;
pub mod time;

pub use bbox::{BoundingBox, LatLon};
pub use time::{
    build_filename, collection_date_from_filename, file_list_for_range, TimeParseError,
};
