//! Serde types for OpenCellID CSV exports.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use wavetracker::RawTowerRecord;

/// OpenCellID serde representation of a cell. Everything is optional so that
/// incomplete rows still reach the normalizer, which decides what is usable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    radio: Option<String>,
    mcc: Option<String>,
    net: Option<String>,
    area: Option<String>,
    cell: Option<String>,
    lon: Option<String>,
    lat: Option<String>,
    range: Option<String>,
    samples: Option<String>,
    average_signal: Option<String>,
}

impl Record {
    fn into_raw(self) -> RawTowerRecord {
        RawTowerRecord::new(json!({
            "radio": self.radio,
            "mcc": self.mcc,
            "mnc": self.net,
            "lac": self.area,
            "cellid": self.cell,
            "lon": self.lon,
            "lat": self.lat,
            "range": self.range,
            "samples": self.samples,
            "signal": self.average_signal,
        }))
    }
}

/// Reads every row of an OpenCellID export, in file order.
///
/// Row `i` (0-based, header excluded) becomes record `i`, so positions
/// reported by the analysis point back into the file.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawTowerRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut output = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let record: Record = result.with_context(|| format!("Failed to read row {}", i + 1))?;
        output.push(record.into_raw());
    }

    Ok(output)
}
