//! Grid materialization: decoded XMRG cells to geographic polygons.

use geo::{coord, LineString, Polygon};
use precip_common::BoundingBox;
use projection::{HrapCoord, HrapProjection};
use tracing::warn;
use xmrg_parser::XmrgGrid;

/// One grid cell lifted into geographic space: a quadrilateral ring of the
/// cell's four projected corners, tagged with its scaled precipitation value.
#[derive(Debug, Clone)]
pub struct GeoCell {
    pub polygon: Polygon<f64>,
    pub precipitation: f64,
}

/// Options controlling materialization.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Restrict output to cells inside this geographic window. `None`
    /// materializes the full grid.
    pub bounding_box: Option<BoundingBox>,
    /// Unit multiplier applied to raw cell values. XMRG stores hundredths of
    /// millimeters, so 0.01 yields millimeters.
    pub data_multiplier: f64,
    /// Emit every cell, not just those with positive precipitation.
    pub keep_all_values: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            bounding_box: None,
            data_multiplier: 0.01,
            keep_all_values: false,
        }
    }
}

/// Materialize the cells of a decoded grid as geographic polygons.
///
/// Each included cell becomes a closed ring of its four corner projections.
/// The projection yields eastward-positive longitudes; the sign is flipped
/// here so emitted polygons use standard negative-west coordinates. Cells
/// whose corners fail to project are logged and skipped.
pub fn materialize_cells(grid: &XmrgGrid, options: &MaterializeOptions) -> Vec<GeoCell> {
    let header = &grid.header;
    let proj = HrapProjection::new(
        header.origin_col,
        header.origin_row,
        header.col_count,
        header.row_count,
    );

    let (start_col, start_row, end_col, end_row) = match &options.bounding_box {
        Some(bbox) => {
            let lower_left = proj.geo_to_grid(bbox.min, true, true);
            let upper_right = proj.geo_to_grid(bbox.max, true, true);
            (
                clamp_index(lower_left.column, header.col_count),
                clamp_index(lower_left.row, header.row_count),
                clamp_index(upper_right.column, header.col_count),
                clamp_index(upper_right.row, header.row_count),
            )
        }
        None => (0, 0, header.col_count, header.row_count),
    };

    let mut cells = Vec::new();
    for row in start_row..end_row {
        for col in start_col..end_col {
            let raw = match grid.value(col, row) {
                Some(v) => v,
                None => continue,
            };
            let value = raw as f64 * options.data_multiplier;
            if !options.keep_all_values && value <= 0.0 {
                continue;
            }

            match cell_polygon(&proj, header.origin_col, header.origin_row, col, row) {
                Ok(polygon) => cells.push(GeoCell {
                    polygon,
                    precipitation: value,
                }),
                Err(error) => {
                    warn!(col, row, %error, "skipping cell that failed to project");
                }
            }
        }
    }

    cells
}

fn clamp_index(value: f64, limit: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value as usize).min(limit)
    }
}

/// Build the closed corner ring for cell (`col`, `row`), counterclockwise
/// from the southwest corner.
fn cell_polygon(
    proj: &HrapProjection,
    origin_col: i32,
    origin_row: i32,
    col: usize,
    row: usize,
) -> Result<Polygon<f64>, projection::ProjectionError> {
    let west = |c: f64, r: f64| -> Result<(f64, f64), projection::ProjectionError> {
        let ll = proj.grid_to_geo(HrapCoord::new(c, r))?;
        // External sign convention: negative-west longitudes.
        Ok((-ll.longitude, ll.latitude))
    };

    let base_col = origin_col as f64 + col as f64;
    let base_row = origin_row as f64 + row as f64;

    let (sw_x, sw_y) = west(base_col, base_row)?;
    let (nw_x, nw_y) = west(base_col, base_row + 1.0)?;
    let (ne_x, ne_y) = west(base_col + 1.0, base_row + 1.0)?;
    let (se_x, se_y) = west(base_col + 1.0, base_row)?;

    Ok(Polygon::new(
        LineString::from(vec![
            coord! { x: sw_x, y: sw_y },
            coord! { x: nw_x, y: nw_y },
            coord! { x: ne_x, y: ne_y },
            coord! { x: se_x, y: se_y },
            coord! { x: sw_x, y: sw_y },
        ]),
        vec![],
    ))
}
