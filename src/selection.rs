//! Picks the records an area analysis should see.
//!
//! The engine assumes every tower it aggregates lies inside the box, so the
//! box (and optional radio) filter happens here, before analysis. Records keep
//! their position in the original input so that dropped records can be traced
//! back to the request body or CSV row they came from.

use serde::Serialize;
use tracing::{debug, info, warn};
use wavetracker::{analyze_indexed_area, AreaAnalysis, BoundingBox, RawTowerRecord, Result};

/// Records left out before analysis, by reason.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub outside_box: usize,
    pub other_radio: usize,
    pub over_limit: usize,
}

#[derive(Debug)]
pub struct Selection {
    pub records: Vec<(usize, RawTowerRecord)>,
    pub received: usize,
    pub skipped: Skipped,
}

/// Area analysis together with what happened to the input before it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    #[serde(flatten)]
    pub analysis: AreaAnalysis,
    pub received_records: usize,
    pub skipped_records: Skipped,
}

/// Keeps records inside `bbox` (and of `radio`, compared case-insensitively),
/// up to `limit` of them.
///
/// Records without a readable position are kept so that the analysis reports
/// them as dropped.
pub fn select(
    records: impl IntoIterator<Item = RawTowerRecord>,
    bbox: &BoundingBox,
    radio: Option<&str>,
    limit: usize,
) -> Selection {
    let mut selected = Vec::new();
    let mut skipped = Skipped::default();
    let mut received = 0;

    for (index, record) in records.into_iter().enumerate() {
        received += 1;

        if let Some(radio) = radio {
            if !record.radio().is_some_and(|r| r.eq_ignore_ascii_case(radio)) {
                skipped.other_radio += 1;
                continue;
            }
        }
        if let Some((lat, lon)) = record.position() {
            if !bbox.contains(lat, lon) {
                skipped.outside_box += 1;
                continue;
            }
        }
        if selected.len() >= limit {
            skipped.over_limit += 1;
            continue;
        }

        selected.push((index, record));
    }

    Selection {
        records: selected,
        received,
        skipped,
    }
}

/// Selects records and analyses them, logging what was left out.
pub fn analyze(
    records: impl IntoIterator<Item = RawTowerRecord>,
    bbox: &BoundingBox,
    radio: Option<&str>,
    limit: usize,
) -> Result<AreaReport> {
    bbox.validate()?;

    let Selection {
        records,
        received,
        skipped,
    } = select(records, bbox, radio, limit);
    if skipped.over_limit > 0 {
        warn!(
            "{} records in area, analysing the first {limit}",
            records.len() + skipped.over_limit
        );
    }

    let analysis = analyze_indexed_area(bbox, &records)?;
    for dropped in &analysis.dropped_records {
        debug!("dropped record #{}: {}", dropped.index, dropped.reason);
    }
    info!(
        "analysed {} of {received} records over {:.3} km², dropped {}, skipped {:?}",
        analysis.cells.len(),
        analysis.coverage_metrics.area_size_km2,
        analysis.dropped_records.len(),
        skipped,
    );

    Ok(AreaReport {
        analysis,
        received_records: received,
        skipped_records: skipped,
    })
}
