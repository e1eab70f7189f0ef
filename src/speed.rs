//! Throughput estimate and advice for a single tower.

use serde::{Deserialize, Serialize};

use crate::tower::Tower;

/// Signals strictly above this level are classified as [`SignalQuality::Good`].
pub const GOOD_SIGNAL_THRESHOLD_DBM: f64 = -85.0;

pub const MIN_SPEED_MBPS: f64 = 1.0;
pub const MAX_SPEED_MBPS: f64 = 150.0;

/// Signal level at which the estimate reaches [`MAX_SPEED_MBPS`].
const PEAK_SIGNAL_DBM: f64 = -50.0;
/// dB of signal loss that costs one order of magnitude of throughput.
const DB_PER_DECADE: f64 = 40.0;

const GOOD_SUGGESTIONS: &[&str] = &[
    "Monitor signal strength variations throughout the day",
    "Ensure line of sight to the tower when possible",
    "Signal is strong enough for HD streaming and video calls",
];

const POOR_SUGGESTIONS: &[&str] = &[
    "Consider an external antenna if signal strength is consistently low",
    "Move closer to a window or to higher ground for better reception",
    "Check whether another carrier has a closer tower in this area",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Good,
    Poor,
}

impl SignalQuality {
    pub fn classify(signal_dbm: f64) -> Self {
        if signal_dbm > GOOD_SIGNAL_THRESHOLD_DBM {
            SignalQuality::Good
        } else {
            SignalQuality::Poor
        }
    }

    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            SignalQuality::Good => GOOD_SUGGESTIONS,
            SignalQuality::Poor => POOR_SUGGESTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEstimate {
    pub speed_prediction_mbps: f64,
    pub quality: SignalQuality,
    pub suggestions: Vec<String>,
}

/// Predicted downlink throughput for a signal level.
///
/// Throughput falls by a factor of ten for every [`DB_PER_DECADE`] dB below
/// [`PEAK_SIGNAL_DBM`], clamped to `[MIN_SPEED_MBPS, MAX_SPEED_MBPS]`.
pub fn predict_speed_mbps(signal_dbm: f64) -> f64 {
    if signal_dbm.is_nan() {
        return MIN_SPEED_MBPS;
    }
    let speed = MAX_SPEED_MBPS * 10f64.powf((signal_dbm - PEAK_SIGNAL_DBM) / DB_PER_DECADE);
    speed.clamp(MIN_SPEED_MBPS, MAX_SPEED_MBPS)
}

pub fn estimate(tower: &Tower) -> SpeedEstimate {
    let quality = SignalQuality::classify(tower.signal_strength);
    SpeedEstimate {
        speed_prediction_mbps: predict_speed_mbps(tower.signal_strength),
        quality,
        suggestions: quality.suggestions().iter().map(|s| s.to_string()).collect(),
    }
}
