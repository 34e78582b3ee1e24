use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Rank;

/// Dashboard configuration
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file holding the salary dataset
    pub dataset_path: PathBuf,
    /// Rank counted by the "percent of rank by sex" chart
    pub target_rank: Rank,
    /// Decimal places kept for percentages in snapshots
    pub percent_precision: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/Salaries.csv"),
            target_rank: Rank::Prof,
            percent_precision: 2,
        }
    }
}

impl DashboardConfig {
    /// Load a config from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Round a percentage to the configured precision
    pub fn round_percent(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.percent_precision as i32);
        (value * scale).round() / scale
    }
}
