//! Area-level statistics over a set of towers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::Result, geometry::BoundingBox, tower::Tower};

/// Coverage statistics for one bounding box. Values are not rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageMetrics {
    pub area_size_km2: f64,
    pub cell_density_per_km2: f64,
    pub average_range_km: f64,
    pub average_signal_dbm: f64,
    pub tower_count: usize,
    /// Tower count per radio tag, including the `unknown` bucket.
    pub network_type_counts: BTreeMap<String, usize>,
}

/// Computes coverage metrics for `towers` over `bbox`.
///
/// The towers are assumed to lie inside the box; filtering is left to the
/// caller. Fails only if the box itself is invalid. An empty tower set yields
/// zero density, range and signal.
pub fn aggregate(bbox: &BoundingBox, towers: &[Tower]) -> Result<CoverageMetrics> {
    let area_size_km2 = bbox.area_km2()?;
    let count = towers.len();

    let mut network_type_counts = BTreeMap::new();
    let mut range_km = 0.0;
    let mut signal_dbm = 0.0;
    for tower in towers {
        *network_type_counts.entry(tower.radio.clone()).or_insert(0) += 1;
        range_km += tower.range_km();
        signal_dbm += tower.signal_strength;
    }

    let (average_range_km, average_signal_dbm) = if count == 0 {
        (0.0, 0.0)
    } else {
        (range_km / count as f64, signal_dbm / count as f64)
    };

    let cell_density_per_km2 = if count == 0 || area_size_km2 <= 0.0 {
        0.0
    } else {
        count as f64 / area_size_km2
    };

    Ok(CoverageMetrics {
        area_size_km2,
        cell_density_per_km2,
        average_range_km,
        average_signal_dbm,
        tower_count: count,
        network_type_counts,
    })
}
