//! Named boundary polygons (watersheds, basins) to aggregate against.

use crate::error::{AggregationError, Result};
use geo::{Area, Polygon};

/// A named boundary polygon with its precomputed planar area.
///
/// Boundaries are loaded once before a run and shared read-only across all
/// file-processing jobs; nothing mutates them afterwards.
#[derive(Debug, Clone)]
pub struct Boundary {
    name: String,
    geometry: Polygon<f64>,
    area: f64,
}

impl Boundary {
    /// Create a boundary, validating that it has usable planar area.
    pub fn new(name: impl Into<String>, geometry: Polygon<f64>) -> Result<Self> {
        let name = name.into();
        let area = geometry.unsigned_area();
        if area <= 0.0 {
            return Err(AggregationError::DegenerateBoundary(name));
        }
        Ok(Self {
            name,
            geometry,
            area,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }

    /// Planar area in squared coordinate units.
    pub fn area(&self) -> f64 {
        self.area
    }
}
