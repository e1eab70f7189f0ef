//! Entry points combining normalization with the two analysis modes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    coverage::{aggregate, CoverageMetrics},
    error::Result,
    geometry::BoundingBox,
    normalize::{normalize, RawTowerRecord},
    speed::{estimate, SignalQuality},
    tower::Tower,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Tower(TowerAnalysis),
    Area(AreaAnalysis),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerAnalysis {
    pub tower_data: Tower,
    pub speed_prediction_mbps: f64,
    pub signal_quality: SignalQuality,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAnalysis {
    pub cells: Vec<Tower>,
    pub coverage_metrics: CoverageMetrics,
    pub network_types: BTreeMap<String, usize>,
    /// Input records excluded because they could not be normalized.
    #[serde(default)]
    pub dropped_records: Vec<DroppedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRecord {
    /// Position of the record in the input sequence.
    pub index: usize,
    pub reason: String,
}

impl AnalysisResult {
    pub fn as_tower(&self) -> Option<&TowerAnalysis> {
        match self {
            AnalysisResult::Tower(x) => Some(x),
            AnalysisResult::Area(_) => None,
        }
    }

    pub fn as_area(&self) -> Option<&AreaAnalysis> {
        match self {
            AnalysisResult::Tower(_) => None,
            AnalysisResult::Area(x) => Some(x),
        }
    }
}

/// Normalizes one record and estimates its speed. A record without usable
/// coordinates is an error.
pub fn analyze_single_tower(raw: &RawTowerRecord) -> Result<AnalysisResult> {
    let tower = normalize(raw)?;
    let estimate = estimate(&tower);
    Ok(AnalysisResult::Tower(TowerAnalysis {
        tower_data: tower,
        speed_prediction_mbps: estimate.speed_prediction_mbps,
        signal_quality: estimate.quality,
        suggestions: estimate.suggestions,
    }))
}

/// Normalizes every record and aggregates the survivors over `bbox`.
///
/// Records that fail normalization are listed in
/// [`AreaAnalysis::dropped_records`] instead of failing the analysis. Only an
/// invalid `bbox` is an error.
pub fn analyze_area(bbox: &BoundingBox, raw: &[RawTowerRecord]) -> Result<AnalysisResult> {
    let area = area_analysis(bbox, raw.iter().enumerate())?;
    Ok(AnalysisResult::Area(area))
}

/// Like [`analyze_area`], for records that were selected out of a larger
/// input. Each record carries its position in that input, and dropped
/// records are reported under that position.
pub fn analyze_indexed_area(
    bbox: &BoundingBox,
    records: &[(usize, RawTowerRecord)],
) -> Result<AreaAnalysis> {
    area_analysis(bbox, records.iter().map(|(index, record)| (*index, record)))
}

fn area_analysis<'a>(
    bbox: &BoundingBox,
    records: impl Iterator<Item = (usize, &'a RawTowerRecord)>,
) -> Result<AreaAnalysis> {
    let mut cells = Vec::new();
    let mut dropped_records = Vec::new();
    for (index, record) in records {
        match normalize(record) {
            Ok(tower) => cells.push(tower),
            Err(e) => dropped_records.push(DroppedRecord {
                index,
                reason: e.to_string(),
            }),
        }
    }

    let coverage_metrics = aggregate(bbox, &cells)?;
    Ok(AreaAnalysis {
        network_types: coverage_metrics.network_type_counts.clone(),
        cells,
        coverage_metrics,
        dropped_records,
    })
}
