//! Per-file aggregation results.

use crate::materialize::GeoCell;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Result type key for the area-weighted average.
pub const WEIGHTED_AVERAGE: &str = "weighted_average";

/// The results computed from one XMRG file.
///
/// Holds a scalar result map per boundary and, when diagnostics are enabled,
/// the intersected cell pieces per boundary. Built once by the aggregation
/// engine, then handed to a sink and never mutated again.
#[derive(Debug, Clone)]
pub struct XmrgResults {
    collection_time: NaiveDateTime,
    boundary_results: HashMap<String, HashMap<String, f64>>,
    boundary_cells: HashMap<String, Vec<GeoCell>>,
}

impl XmrgResults {
    pub fn new(collection_time: NaiveDateTime) -> Self {
        Self {
            collection_time,
            boundary_results: HashMap::new(),
            boundary_cells: HashMap::new(),
        }
    }

    /// Collection timestamp derived from the source filename (naive civil
    /// time, no timezone conversion applied).
    pub fn collection_time(&self) -> NaiveDateTime {
        self.collection_time
    }

    pub fn add_boundary_result(&mut self, boundary: &str, result_type: &str, value: f64) {
        self.boundary_results
            .entry(boundary.to_string())
            .or_default()
            .insert(result_type.to_string(), value);
    }

    pub fn boundary_result(&self, boundary: &str, result_type: &str) -> Option<f64> {
        self.boundary_results.get(boundary)?.get(result_type).copied()
    }

    /// Iterate all (boundary name, result map) pairs.
    pub fn boundary_results(&self) -> impl Iterator<Item = (&str, &HashMap<String, f64>)> {
        self.boundary_results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn add_boundary_cell(&mut self, boundary: &str, cell: GeoCell) {
        self.boundary_cells
            .entry(boundary.to_string())
            .or_default()
            .push(cell);
    }

    /// Intersected cell pieces retained for a boundary, if diagnostics were
    /// enabled for the run.
    pub fn boundary_cells(&self, boundary: &str) -> Option<&[GeoCell]> {
        self.boundary_cells.get(boundary).map(|v| v.as_slice())
    }

    pub fn boundary_names(&self) -> impl Iterator<Item = &str> {
        self.boundary_results.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.boundary_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_result_lookup() {
        let mut results = XmrgResults::new(timestamp());
        results.add_boundary_result("basin-a", WEIGHTED_AVERAGE, 3.25);

        assert_eq!(results.boundary_result("basin-a", WEIGHTED_AVERAGE), Some(3.25));
        assert_eq!(results.boundary_result("basin-b", WEIGHTED_AVERAGE), None);
        assert_eq!(results.boundary_names().count(), 1);
    }

    #[test]
    fn test_cells_are_separate_from_scalars() {
        let results = XmrgResults::new(timestamp());
        assert!(results.boundary_cells("basin-a").is_none());
        assert!(results.is_empty());
    }
}
