//! Area-weighted aggregation of materialized cells over boundaries.

use crate::boundary::Boundary;
use crate::error::{AggregationError, Result};
use crate::materialize::GeoCell;
use crate::results::{XmrgResults, WEIGHTED_AVERAGE};
use chrono::NaiveDateTime;
use geo::{Area, BooleanOps};
use tracing::warn;

/// Aggregate materialized cells over a set of boundaries.
///
/// Each boundary's weighted average is the sum over its intersected cell
/// pieces of `value * piece_area / boundary_area`; overlap proportions, not
/// cell counts, decide the result. Boundaries are independent: a failure on
/// one is logged and that boundary omitted while the rest still compute.
///
/// With `keep_boundary_cells` set, every intersected piece is retained per
/// boundary for diagnostics; this never affects the scalar results.
pub fn aggregate(
    cells: &[GeoCell],
    boundaries: &[Boundary],
    collection_time: NaiveDateTime,
    keep_boundary_cells: bool,
) -> XmrgResults {
    let mut results = XmrgResults::new(collection_time);

    for boundary in boundaries {
        match aggregate_boundary(cells, boundary, keep_boundary_cells) {
            Ok((weighted_average, pieces)) => {
                results.add_boundary_result(boundary.name(), WEIGHTED_AVERAGE, weighted_average);
                for piece in pieces {
                    results.add_boundary_cell(boundary.name(), piece);
                }
            }
            Err(error) => {
                warn!(boundary = boundary.name(), %error, "boundary aggregation failed");
            }
        }
    }

    results
}

/// Compute one boundary's weighted average and (optionally) its intersected
/// cell pieces.
fn aggregate_boundary(
    cells: &[GeoCell],
    boundary: &Boundary,
    keep_pieces: bool,
) -> Result<(f64, Vec<GeoCell>)> {
    if boundary.area() <= 0.0 {
        return Err(AggregationError::DegenerateBoundary(
            boundary.name().to_string(),
        ));
    }

    let mut weighted_average = 0.0;
    let mut pieces = Vec::new();

    for cell in cells {
        let intersection = boundary.geometry().intersection(&cell.polygon);
        for piece in &intersection {
            let area = piece.unsigned_area();
            if area <= 0.0 {
                continue;
            }
            let percent = area / boundary.area();
            weighted_average += cell.precipitation * percent;

            if keep_pieces {
                pieces.push(GeoCell {
                    polygon: piece.clone(),
                    precipitation: cell.precipitation,
                });
            }
        }
    }

    Ok((weighted_average, pieces))
}
