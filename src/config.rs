//! Dashboard Configuration
//! Regulatory thresholds, season ordering and the archived default dataset.

use crate::data::schema::SEASON_ORDER;
use crate::data::Delimiter;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// WHO annual guideline for PM10 (µg/m³).
pub const WHO_PM10_LIMIT: f64 = 15.0;
/// South African NAAQS annual limit for PM10 (µg/m³).
pub const SA_PM10_LIMIT: f64 = 40.0;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pm10_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Delimiter {0:?} must be a single ASCII character")]
    InvalidDelimiter(char),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub who_limit: f64,
    pub national_limit: f64,
    pub season_order: Vec<String>,
    /// Dataset shown on the default page until the user uploads another.
    pub default_dataset: PathBuf,
    pub default_delimiter: char,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            who_limit: WHO_PM10_LIMIT,
            national_limit: SA_PM10_LIMIT,
            season_order: SEASON_ORDER.iter().map(|s| s.to_string()).collect(),
            default_dataset: PathBuf::from("data/pm10_default.csv"),
            default_delimiter: ';',
        }
    }
}

impl DashboardConfig {
    /// Read a config file. Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.dataset_delimiter()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    /// A broken file is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Separator for the default dataset as a CSV delimiter.
    pub fn dataset_delimiter(&self) -> Result<Delimiter, ConfigError> {
        if self.default_delimiter.is_ascii() {
            Ok(Delimiter::Fixed(self.default_delimiter as u8))
        } else {
            Err(ConfigError::InvalidDelimiter(self.default_delimiter))
        }
    }
}
