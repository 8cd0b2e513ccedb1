//! Geometry fixtures for aggregation tests.

use geo::{coord, LineString, Polygon};

/// Axis-aligned rectangle polygon from corner coordinates.
pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            coord! { x: min_x, y: min_y },
            coord! { x: min_x, y: max_y },
            coord! { x: max_x, y: max_y },
            coord! { x: max_x, y: min_y },
            coord! { x: min_x, y: min_y },
        ]),
        vec![],
    )
}

/// Unit square with its southwest corner at (`min_x`, `min_y`).
pub fn unit_square(min_x: f64, min_y: f64) -> Polygon<f64> {
    rectangle(min_x, min_y, min_x + 1.0, min_y + 1.0)
}
