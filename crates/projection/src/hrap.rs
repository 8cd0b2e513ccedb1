//! HRAP polar-stereographic projection.
//!
//! The Hydrologic Rainfall Analysis Project grid is a polar stereographic
//! projection true at 60°N with a 105°W reference meridian and a mesh length
//! of 4.7625 km at the standard latitude. The national grid origin sits at
//! offset (401, 1601) from the pole in mesh units.
//!
//! `grid_to_geo` yields eastward-positive longitudes relative to the grid's
//! reference meridian; callers flip the sign to get standard negative-west
//! values. `geo_to_grid` accepts either sign since it projects `|longitude|`.

use crate::error::ProjectionError;
use precip_common::LatLon;

/// Earth radius used by the HRAP definition, in km.
pub const EARTH_RADIUS: f64 = 6371.2;
/// Standard (true-at) latitude, degrees.
pub const REFERENCE_LATITUDE: f64 = 60.0;
/// Reference meridian, degrees west.
pub const REFERENCE_LONGITUDE: f64 = 105.0;
/// Mesh length at the standard latitude, km.
pub const MESH_LENGTH: f64 = 4.7625;
/// National grid column offset from the pole.
pub const ORIGIN_COLUMN_OFFSET: f64 = 401.0;
/// National grid row offset from the pole.
pub const ORIGIN_ROW_OFFSET: f64 = 1601.0;

/// A point in HRAP grid space. Fractional coordinates are meaningful; cell
/// (column, row) covers `[column, column+1) x [row, row+1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HrapCoord {
    pub column: f64,
    pub row: f64,
}

impl HrapCoord {
    pub fn new(column: f64, row: f64) -> Self {
        Self { column, row }
    }
}

/// HRAP projection bound to one file's grid window.
///
/// The transform itself is fixed; the window (origin and extent from the
/// file's primary header) only affects clamping and origin adjustment in
/// [`HrapProjection::geo_to_grid`].
#[derive(Debug, Clone)]
pub struct HrapProjection {
    origin_col: f64,
    origin_row: f64,
    col_count: f64,
    row_count: f64,
    /// `EARTH_RADIUS * (1 + sin(refLat)) / MESH_LENGTH`, the planar radius
    /// scale of the projection in mesh units.
    mesh_factor: f64,
}

impl HrapProjection {
    /// Create a projection for a grid window with the given HRAP origin and
    /// extent (typically from a decoded file header).
    pub fn new(origin_col: i32, origin_row: i32, col_count: usize, row_count: usize) -> Self {
        let mesh_factor =
            EARTH_RADIUS * (1.0 + REFERENCE_LATITUDE.to_radians().sin()) / MESH_LENGTH;
        Self {
            origin_col: origin_col as f64,
            origin_row: origin_row as f64,
            col_count: col_count as f64,
            row_count: row_count as f64,
            mesh_factor,
        }
    }

    /// Convert a global HRAP coordinate to latitude/longitude.
    ///
    /// The returned longitude is eastward-positive in the grid's reference
    /// frame; negate it for standard negative-west degrees.
    pub fn grid_to_geo(&self, point: HrapCoord) -> Result<LatLon, ProjectionError> {
        let x = point.column - ORIGIN_COLUMN_OFFSET;
        let y = point.row - ORIGIN_ROW_OFFSET;
        let rr = x * x + y * y;
        let gi = self.mesh_factor * self.mesh_factor;

        let sine = (gi - rr) / (gi + rr);
        if !(-1.0..=1.0).contains(&sine) {
            return Err(ProjectionError::OutOfDomain {
                column: point.column,
                row: point.row,
                value: sine,
            });
        }
        let latitude = sine.asin().to_degrees();

        let mut angle = y.atan2(x).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }

        let mut longitude = 270.0 + REFERENCE_LONGITUDE - angle;
        if longitude < 0.0 {
            longitude += 360.0;
        } else if longitude > 360.0 {
            longitude -= 360.0;
        }

        Ok(LatLon::new(latitude, longitude))
    }

    /// Convert latitude/longitude to an HRAP coordinate.
    ///
    /// The result is clamped so it never exceeds the grid window's far edge.
    /// `round_to_nearest` applies the historical nearest-integer-below rule
    /// (`floor(v - 0.5)`, not standard rounding). `adjust_to_origin`
    /// subtracts the window origin, giving local 0-based indices.
    pub fn geo_to_grid(
        &self,
        point: LatLon,
        round_to_nearest: bool,
        adjust_to_origin: bool,
    ) -> HrapCoord {
        let flat = point.latitude.to_radians();
        let flon = (point.longitude.abs() + 180.0 - REFERENCE_LONGITUDE).to_radians();

        let r = self.mesh_factor * flat.cos() / (1.0 + flat.sin());
        let mut column = r * flon.sin() + ORIGIN_COLUMN_OFFSET;
        let mut row = r * flon.cos() + ORIGIN_ROW_OFFSET;

        if column > self.origin_col + self.col_count {
            column = self.origin_col + self.col_count;
        }
        if row > self.origin_row + self.row_count {
            row = self.origin_row + self.row_count;
        }

        if round_to_nearest {
            column = (column - 0.5).floor();
            row = (row - 0.5).floor();
        }
        if adjust_to_origin {
            column -= self.origin_col;
            row -= self.origin_row;
        }

        HrapCoord::new(column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn national_grid() -> HrapProjection {
        // Full national HRAP grid.
        HrapProjection::new(1, 1, 1121, 881)
    }

    #[test]
    fn test_pole_maps_to_latitude_90() {
        let proj = national_grid();
        let pole = proj
            .grid_to_geo(HrapCoord::new(ORIGIN_COLUMN_OFFSET, ORIGIN_ROW_OFFSET))
            .unwrap();
        assert!((pole.latitude - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_meridian_column() {
        // Directly south of the pole (x = 0, y < 0) lies the reference
        // meridian, 105°W.
        let proj = national_grid();
        let ll = proj
            .grid_to_geo(HrapCoord::new(ORIGIN_COLUMN_OFFSET, ORIGIN_ROW_OFFSET - 800.0))
            .unwrap();
        assert!((ll.longitude - REFERENCE_LONGITUDE).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_inside_grid() {
        let proj = national_grid();

        // Sweep points across CONUS latitudes and longitudes.
        for lat_tenths in (250..500).step_by(17) {
            for lon_tenths in (700..1250).step_by(23) {
                let lat = lat_tenths as f64 / 10.0;
                let lon = -(lon_tenths as f64) / 10.0;

                let hrap = proj.geo_to_grid(LatLon::new(lat, lon), false, false);
                let back = proj.grid_to_geo(hrap).unwrap();

                assert!(
                    (back.latitude - lat).abs() < 1e-3,
                    "lat roundtrip failed at ({lat}, {lon}): got {}",
                    back.latitude
                );
                // grid_to_geo yields eastward-positive longitude.
                assert!(
                    (back.longitude - lon.abs()).abs() < 1e-3,
                    "lon roundtrip failed at ({lat}, {lon}): got {}",
                    back.longitude
                );
            }
        }
    }

    #[test]
    fn test_roundtrip_with_rounding_stays_within_one_cell() {
        let proj = national_grid();
        let point = LatLon::new(32.78, -79.93);

        let exact = proj.geo_to_grid(point, false, false);
        let rounded = proj.geo_to_grid(point, true, false);

        assert!((exact.column - rounded.column).abs() <= 1.0);
        assert!((exact.row - rounded.row).abs() <= 1.0);
        assert_eq!(rounded.column, rounded.column.trunc());
        assert_eq!(rounded.row, rounded.row.trunc());
    }

    #[test]
    fn test_round_is_nearest_integer_below() {
        let proj = national_grid();
        // floor(v - 0.5): 700.49 rounds down to 699, not 700.
        let a = proj.geo_to_grid(
            proj.grid_to_geo(HrapCoord::new(700.49, 500.0)).unwrap().into_west(),
            true,
            false,
        );
        assert_eq!(a.column, 699.0);
    }

    #[test]
    fn test_clamps_to_grid_window() {
        // A tiny window far from Alaska; a far-northwest point must clamp.
        let proj = HrapProjection::new(367, 263, 10, 10);
        let clamped = proj.geo_to_grid(LatLon::new(60.0, -150.0), false, false);
        assert!(clamped.column <= 377.0);
        assert!(clamped.row <= 273.0);
    }

    #[test]
    fn test_adjust_to_origin_gives_local_indices() {
        let proj = HrapProjection::new(367, 263, 100, 100);
        let global = proj.geo_to_grid(LatLon::new(33.0, -80.0), true, false);
        let local = proj.geo_to_grid(LatLon::new(33.0, -80.0), true, true);
        assert_eq!(local.column, global.column - 367.0);
        assert_eq!(local.row, global.row - 263.0);
    }

    // Helper: grid_to_geo yields eastward-positive longitudes; tests that
    // feed them back through geo_to_grid want the external sign convention.
    trait IntoWest {
        fn into_west(self) -> LatLon;
    }

    impl IntoWest for LatLon {
        fn into_west(mut self) -> LatLon {
            self.longitude = -self.longitude;
            self
        }
    }
}
