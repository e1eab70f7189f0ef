//! Coverage analysis for cellular towers.
//!
//! Raw records from a cell-location database are normalized into [`Tower`]s,
//! which are then either scored individually ([`speed`]) or aggregated over a
//! bounding box ([`coverage`]). [`analysis`] ties both modes together.

pub mod analysis;
pub mod coverage;
pub mod error;
pub mod geometry;
pub mod insight;
pub mod normalize;
pub mod speed;
pub mod tower;

pub use analysis::{
    analyze_area, analyze_indexed_area, analyze_single_tower, AnalysisResult, AreaAnalysis,
    DroppedRecord, TowerAnalysis,
};
pub use coverage::{aggregate, CoverageMetrics};
pub use error::{Error, Result};
pub use geometry::{bounding_box_area_km2, haversine_distance_km, BoundingBox};
pub use normalize::{normalize, RawTowerRecord};
pub use speed::{estimate, SignalQuality, SpeedEstimate, GOOD_SIGNAL_THRESHOLD_DBM};
pub use tower::{CellRadio, Tower};
