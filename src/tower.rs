use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Bucket label for towers whose upstream record carries no radio technology.
pub const UNKNOWN_RADIO: &str = "unknown";

/// Range assumed when neither the record nor its radio technology gives one.
pub const FALLBACK_RANGE_M: f64 = 1000.0;

/// Signal strength assumed when upstream has no measurement. Deliberately weak
/// so that missing data does not make an area look better than it is.
pub const FALLBACK_SIGNAL_DBM: f64 = -95.0;

/// Radio technologies with a known typical cell radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum CellRadio {
    #[strum(serialize = "GSM")]
    Gsm,
    #[strum(serialize = "UMTS", serialize = "WCDMA")]
    Umts,
    #[strum(serialize = "LTE")]
    Lte,
    #[strum(serialize = "NR", serialize = "5G")]
    Nr,
    #[strum(serialize = "CDMA")]
    Cdma,
}

impl CellRadio {
    /// Recognized technology for an upstream radio tag, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.trim().parse().ok()
    }

    /// Typical coverage radius in metres for a macro cell of this technology.
    pub fn typical_range_m(self) -> f64 {
        match self {
            CellRadio::Gsm | CellRadio::Cdma => 5000.0,
            CellRadio::Umts => 2000.0,
            CellRadio::Lte => 1500.0,
            CellRadio::Nr => 500.0,
        }
    }
}

/// Canonical cell site, produced by [`crate::normalize`].
///
/// Coordinates are always valid WGS-84 degrees, `range` is a non-negative
/// radius in metres and `signal_strength` is always present (in dBm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tower {
    pub latitude: f64,
    pub longitude: f64,
    pub mcc: String,
    pub mnc: String,
    pub lac: String,
    pub cell_id: String,
    pub range: f64,
    pub signal_strength: f64,
    pub radio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<u64>,
}

impl Tower {
    pub fn range_km(&self) -> f64 {
        self.range / 1000.0
    }
}
