use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http_port: u16,
    pub bind_address: String,
    pub json_limit_bytes: usize,

    // upstream area queries are capped at this many cells, anything beyond
    // is not analysed
    pub max_area_records: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            bind_address: "0.0.0.0".to_owned(),
            json_limit_bytes: 16 * 1024 * 1024,
            max_area_records: 1000,
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    parse(&data)
}

/// Like [`load`], but a missing file yields the default configuration.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load(path)
    } else {
        Ok(Config::default())
    }
}

fn parse(data: &str) -> Result<Config> {
    let config = toml::from_str(data).context("Failed to parse config")?;
    Ok(config)
}
