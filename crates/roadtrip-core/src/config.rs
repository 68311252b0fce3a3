use std::fs;
use std::path::Path;

use roadtrip_parser::{RowLayout, TableOptions};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::speed::SpeedPairing;

/// Settings for one pipeline run, usually read from a TOML file.
///
/// ```toml
/// speed_pairing = "corrected"
/// require_chronological = true
///
/// [layout]
/// longitude = 0
/// latitude = 1
///
/// [input]
/// delimiter = ";"
/// table = "trip_2021"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub speed_pairing: SpeedPairing,
    pub require_chronological: bool,
    pub layout: RowLayout,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub has_headers: bool,
    pub delimiter: char,
    /// SQLite table holding the checkpoints.
    pub table: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: ',',
            table: "road_trip".to_string(),
        }
    }
}

impl InputConfig {
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            has_headers: self.has_headers,
            delimiter: self.delimiter,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
