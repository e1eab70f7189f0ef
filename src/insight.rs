//! Text generation around analysis results.
//!
//! The engine has no opinion on how results are explained; this module only
//! provides the seam ([`InsightGenerator`]) together with the prompt a model
//! would be given and a deterministic template answer.

use std::fmt::Write;

use crate::{
    analysis::{AnalysisResult, AreaAnalysis, TowerAnalysis},
    speed::SignalQuality,
};

/// Areas with more towers than this are described as having good coverage.
const GOOD_COVERAGE_TOWERS: usize = 5;
/// Density (towers per km²) above which coverage is described as robust.
const ROBUST_DENSITY_PER_KM2: f64 = 2.0;

pub trait InsightGenerator {
    fn generate(&self, question: &str, result: &AnalysisResult) -> String;
}

/// Template answer used when no language model is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedInsights;

impl InsightGenerator for CannedInsights {
    fn generate(&self, _question: &str, result: &AnalysisResult) -> String {
        let mut out = String::from("Based on the provided network data, here's my analysis:\n\n");
        match result {
            AnalysisResult::Tower(t) => {
                let good = SignalQuality::classify(t.tower_data.signal_strength) == SignalQuality::Good;
                let _ = writeln!(
                    out,
                    "The cell tower shows {} signal strength at {}dBm. This indicates {} connectivity.",
                    if good { "good" } else { "suboptimal" },
                    t.tower_data.signal_strength,
                    if good { "reliable" } else { "potentially unstable" },
                );
                out.push_str("\nRecommendations:\n");
                out.push_str("1. Monitor signal strength variations throughout the day\n");
                out.push_str("2. Ensure line of sight to the tower when possible\n");
                out.push_str("3. Consider external antenna if signal strength is consistently low");
            }
            AnalysisResult::Area(a) => {
                let count = a.cells.len();
                let density = a.coverage_metrics.cell_density_per_km2;
                let _ = writeln!(
                    out,
                    "The area shows {} coverage with {} towers. The cell density of {:.2} cells/km² suggests {} network coverage.",
                    if count > GOOD_COVERAGE_TOWERS { "good" } else { "limited" },
                    count,
                    density,
                    if density > ROBUST_DENSITY_PER_KM2 { "robust" } else { "potentially sparse" },
                );
                out.push_str("\nRecommendations:\n");
                out.push_str("1. Consider tower placement optimization in areas with lower density\n");
                out.push_str("2. Evaluate the distribution of different network technologies (GSM/UMTS/LTE)\n");
                out.push_str("3. Plan for capacity expansion in high-traffic areas");
            }
        }
        out
    }
}

/// Renders the model prompt for `question` about `result`.
pub fn prompt(question: &str, result: &AnalysisResult) -> String {
    let context = match result {
        AnalysisResult::Tower(t) => tower_context(t),
        AnalysisResult::Area(a) => area_context(a),
    };

    format!(
        "You are an expert in mobile network analysis and optimization. Based on the following network data, {}\n\n{}\n\
         Please provide a detailed, professional analysis focusing on the specific question. \
         Include technical insights and practical recommendations where relevant.",
        question.trim().to_lowercase(),
        context,
    )
}

fn tower_context(t: &TowerAnalysis) -> String {
    let tower = &t.tower_data;
    format!(
        "Analysis of a single cell tower:\n\
         - Signal Strength: {}dBm\n\
         - Range: {}m\n\
         - Estimated Speed: {:.1}Mbps\n\
         - Location: {}, {}\n",
        tower.signal_strength, tower.range, t.speed_prediction_mbps, tower.latitude, tower.longitude,
    )
}

fn area_context(a: &AreaAnalysis) -> String {
    let m = &a.coverage_metrics;
    let mut out = format!(
        "Analysis of an area with {} cell towers:\n\
         - Average Signal Strength: {:.2}dBm\n\
         - Cell Density: {:.2} cells/km²\n\
         - Area Size: {:.2}km²\n\
         - Average Tower Range: {:.2}km\n\n\
         Network Types Distribution:\n",
        a.cells.len(),
        m.average_signal_dbm,
        m.cell_density_per_km2,
        m.area_size_km2,
        m.average_range_km,
    );
    for (radio, count) in &a.network_types {
        let _ = writeln!(out, "- {radio}: {count} towers");
    }
    out
}
