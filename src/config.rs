// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::model::record::RecordKeys;
use crate::model::template::DEFAULT_OFF_RECORD_LABEL;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_calendar_name() -> String {
    "{name} カレンダー".to_string()
}
fn default_calendar_description() -> String {
    "{name}カレンダー".to_string()
}
fn default_product_id() -> String {
    "-//AutoGenerator//NONSGML v1.0//EN".to_string()
}
fn default_off_record_label() -> String {
    DEFAULT_OFF_RECORD_LABEL.to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Template for X-WR-CALNAME, rendered against the institution record.
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
    /// Template for X-WR-CALDESC, rendered against the institution record.
    #[serde(default = "default_calendar_description")]
    pub calendar_description: String,
    #[serde(default = "default_product_id")]
    pub product_id: String,
    #[serde(default = "default_off_record_label")]
    pub off_record_label: String,
    #[serde(default)]
    pub keys: RecordKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            calendar_name: default_calendar_name(),
            calendar_description: default_calendar_description(),
            product_id: default_product_id(),
            off_record_label: default_off_record_label(),
            keys: RecordKeys::default(),
        }
    }
}

impl Config {
    /// Load the configuration from a TOML file.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
