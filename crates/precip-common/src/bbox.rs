//! Geographic point and bounding box types.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Longitudes follow the standard negative-west convention
/// (e.g., Charleston SC is roughly `LatLon::new(32.78, -79.93)`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geographic bounding box in degrees.
///
/// `min` is the lower-left (southwest) corner and `max` the upper-right
/// (northeast) corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: LatLon,
    pub max: LatLon,
}

impl BoundingBox {
    /// Create a bounding box from southwest and northeast corners.
    pub fn new(min: LatLon, max: LatLon) -> Self {
        Self { min, max }
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max.longitude - self.min.longitude
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max.latitude - self.min.latitude
    }

    /// Check if a point falls inside this box.
    ///
    /// The southwest edge is inclusive and the northeast edge exclusive, so
    /// adjacent boxes tile without double-counting points on shared edges.
    pub fn contains(&self, point: LatLon) -> bool {
        point.latitude >= self.min.latitude
            && point.longitude >= self.min.longitude
            && point.latitude < self.max.latitude
            && point.longitude < self.max.longitude
    }
}
