//! Canonicalization of loosely-typed upstream tower records.
//!
//! Upstream cell databases disagree on field names and casing, and often send
//! numbers as strings. All of that is absorbed here so that everything
//! downstream can rely on the invariants of [`Tower`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    tower::{CellRadio, Tower, FALLBACK_RANGE_M, FALLBACK_SIGNAL_DBM, UNKNOWN_RADIO},
};

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LON_KEYS: &[&str] = &["lon", "lng", "longitude"];
const RANGE_KEYS: &[&str] = &["range"];
const SIGNAL_KEYS: &[&str] = &[
    "signal",
    "signalStrength",
    "averageSignal",
    "averageSignalStrength",
];
const RADIO_KEYS: &[&str] = &["radio", "radioType"];
const MCC_KEYS: &[&str] = &["mcc"];
const MNC_KEYS: &[&str] = &["mnc", "net"];
const LAC_KEYS: &[&str] = &["lac", "area", "tac"];
const CELL_KEYS: &[&str] = &["cellid", "cell"];
const SAMPLES_KEYS: &[&str] = &["samples"];

/// One record as received from the upstream cell database.
///
/// Any JSON value is accepted; whether it is usable is decided by
/// [`normalize`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawTowerRecord(Value);

impl RawTowerRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Radio technology tag as sent upstream, if any.
    pub fn radio(&self) -> Option<&str> {
        match self.field(RADIO_KEYS) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// Latitude and longitude, if both can be read as valid coordinates.
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = coordinate(self, LAT_KEYS, "lat", 90.0).ok()?;
        let lon = coordinate(self, LON_KEYS, "lon", 180.0).ok()?;
        Some((lat, lon))
    }

    /// First non-null value stored under any of `keys`, compared without
    /// regard to ASCII case. Earlier keys win.
    fn field(&self, keys: &[&str]) -> Option<&Value> {
        let object = self.0.as_object()?;
        keys.iter().find_map(|key| {
            object
                .iter()
                .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.is_null())
                .map(|(_, v)| v)
        })
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        self.field(keys).and_then(coerce_number)
    }

    fn identifier(&self, keys: &[&str]) -> String {
        match self.field(keys) {
            Some(Value::String(s)) => s.trim().to_owned(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    n.filter(|x: &f64| x.is_finite())
}

fn coordinate(raw: &RawTowerRecord, keys: &[&str], field: &'static str, limit: f64) -> Result<f64> {
    let value = raw.field(keys).ok_or_else(|| Error::MalformedRecord {
        field,
        reason: "is missing".to_owned(),
    })?;
    let x = coerce_number(value).ok_or_else(|| Error::MalformedRecord {
        field,
        reason: format!("is not numeric: {value}"),
    })?;
    if x.abs() > limit {
        return Err(Error::MalformedRecord {
            field,
            reason: format!("must be within [-{limit}, {limit}], got {x}"),
        });
    }
    Ok(x)
}

/// Converts one upstream record into a [`Tower`].
///
/// Only missing or unusable coordinates are fatal. Other fields fall back to
/// defaults:
/// - signal strength: absent, non-numeric or `0` (the upstream "unknown"
///   marker) becomes [`FALLBACK_SIGNAL_DBM`]
/// - range: absent, non-numeric or negative becomes the typical range of the
///   radio technology, else [`FALLBACK_RANGE_M`]
/// - radio: absent or blank becomes [`UNKNOWN_RADIO`]
pub fn normalize(raw: &RawTowerRecord) -> Result<Tower> {
    if !raw.0.is_object() {
        return Err(Error::MalformedRecord {
            field: "record",
            reason: format!("is not an object: {}", raw.0),
        });
    }

    let latitude = coordinate(raw, LAT_KEYS, "lat", 90.0)?;
    let longitude = coordinate(raw, LON_KEYS, "lon", 180.0)?;

    let radio = raw.radio().unwrap_or(UNKNOWN_RADIO).to_owned();

    let signal_strength = raw
        .number(SIGNAL_KEYS)
        .filter(|x| *x != 0.0)
        .unwrap_or(FALLBACK_SIGNAL_DBM);

    let range = match raw.number(RANGE_KEYS).filter(|x| *x >= 0.0) {
        Some(x) => x,
        None => CellRadio::from_tag(&radio)
            .map(CellRadio::typical_range_m)
            .unwrap_or(FALLBACK_RANGE_M),
    };

    let samples = raw
        .number(SAMPLES_KEYS)
        .filter(|x| *x >= 0.0)
        .map(|x| x as u64);

    Ok(Tower {
        latitude,
        longitude,
        mcc: raw.identifier(MCC_KEYS),
        mnc: raw.identifier(MNC_KEYS),
        lac: raw.identifier(LAC_KEYS),
        cell_id: raw.identifier(CELL_KEYS),
        range,
        signal_strength,
        radio,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawTowerRecord {
        RawTowerRecord::new(value)
    }

    #[test]
    fn full_record() {
        let tower = normalize(&raw(json!({
            "lat": 40.7128,
            "lon": -74.006,
            "range": 2000,
            "signal": -80,
            "radio": "LTE",
            "mcc": 310,
            "mnc": "026",
            "lac": "07011",
            "cellid": 123456,
            "samples": 14
        })))
        .unwrap();

        assert_eq!(tower.latitude, 40.7128);
        assert_eq!(tower.longitude, -74.006);
        assert_eq!(tower.range, 2000.0);
        assert_eq!(tower.signal_strength, -80.0);
        assert_eq!(tower.radio, "LTE");
        assert_eq!(tower.mcc, "310");
        assert_eq!(tower.mnc, "026");
        assert_eq!(tower.lac, "07011");
        assert_eq!(tower.cell_id, "123456");
        assert_eq!(tower.samples, Some(14));
    }

    #[test]
    fn numbers_as_strings() {
        let tower = normalize(&raw(json!({
            "lat": " 51.5 ",
            "lon": "-0.12",
            "range": "750",
            "signal": "-101"
        })))
        .unwrap();
        assert_eq!(tower.latitude, 51.5);
        assert_eq!(tower.longitude, -0.12);
        assert_eq!(tower.range, 750.0);
        assert_eq!(tower.signal_strength, -101.0);
    }

    #[test]
    fn aliases_and_casing() {
        let tower = normalize(&raw(json!({
            "Latitude": 1.0,
            "LNG": 2.0,
            "averageSignalStrength": -70,
            "RadioType": "gsm",
            "net": 1,
            "area": 2,
            "cellId": 3
        })))
        .unwrap();
        assert_eq!(tower.latitude, 1.0);
        assert_eq!(tower.longitude, 2.0);
        assert_eq!(tower.signal_strength, -70.0);
        assert_eq!(tower.radio, "gsm");
        assert_eq!(tower.mnc, "1");
        assert_eq!(tower.lac, "2");
        assert_eq!(tower.cell_id, "3");
    }

    #[test]
    fn missing_signal_defaults_low() {
        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2 }))).unwrap();
        assert_eq!(tower.signal_strength, -95.0);

        for signal in [json!(null), json!("n/a"), json!(0), json!("")] {
            let tower = normalize(&raw(json!({ "lat": 1, "lon": 2, "signal": signal }))).unwrap();
            assert_eq!(tower.signal_strength, FALLBACK_SIGNAL_DBM, "{signal}");
        }
    }

    #[test]
    fn missing_radio_is_unknown() {
        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2 }))).unwrap();
        assert_eq!(tower.radio, UNKNOWN_RADIO);
        assert_eq!(tower.range, FALLBACK_RANGE_M);

        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2, "radio": "  " }))).unwrap();
        assert_eq!(tower.radio, UNKNOWN_RADIO);
    }

    #[test]
    fn range_falls_back_per_radio() {
        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2, "radio": "NR" }))).unwrap();
        assert_eq!(tower.range, 500.0);

        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2, "radio": "GSM", "range": -5 }))).unwrap();
        assert_eq!(tower.range, 5000.0);

        let tower = normalize(&raw(json!({ "lat": 1, "lon": 2, "radio": "TETRA" }))).unwrap();
        assert_eq!(tower.radio, "TETRA");
        assert_eq!(tower.range, FALLBACK_RANGE_M);
    }

    #[test]
    fn missing_coordinates_are_malformed() {
        let err = normalize(&raw(json!({ "lon": 2, "signal": -70 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lat", .. }));

        let err = normalize(&raw(json!({ "lat": 1 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lon", .. }));

        let err = normalize(&raw(json!({ "lat": "north", "lon": 2 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lat", .. }));

        let err = normalize(&raw(json!({ "lat": null, "lon": 2 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lat", .. }));
    }

    #[test]
    fn out_of_range_coordinates_are_malformed() {
        let err = normalize(&raw(json!({ "lat": 91, "lon": 2 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lat", .. }));

        let err = normalize(&raw(json!({ "lat": 1, "lon": -180.5 }))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "lon", .. }));
    }

    #[test]
    fn position_uses_coordinate_rules() {
        assert_eq!(
            raw(json!({ "Latitude": "40.71", "lng": -74.01 })).position(),
            Some((40.71, -74.01))
        );
        assert_eq!(raw(json!({ "lat": 40.71 })).position(), None);
        assert_eq!(raw(json!({ "lat": 95, "lon": 0 })).position(), None);
        assert_eq!(raw(json!("garbage")).position(), None);
    }

    #[test]
    fn non_object_is_malformed() {
        let err = normalize(&raw(json!([1, 2]))).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { field: "record", .. }));
    }
}
