//! Dyno configuration
//!
//! Vehicle profile and test thresholds, loaded once at startup from a JSON
//! document:
//!
//! ```json
//! {
//!   "vehicle": { "name": "Miata", "weight_lbs": 2400 },
//!   "test": { "start_speed_mph": 20, "end_speed_mph": 60 }
//! }
//! ```
//!
//! Every field is required; nothing is defaulted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in the working directory and the user config dir
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory under the user config dir
const APP_DIR_NAME: &str = "gps-dyno";

/// Errors that can occur while loading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// The vehicle under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Display name
    pub name: String,
    /// Vehicle weight including driver, in pounds
    pub weight_lbs: f64,
}

/// Speed window a run is timed across
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestThresholds {
    /// Timing starts when speed rises through this value
    #[serde(rename = "start_speed_mph")]
    pub start_mph: f64,
    /// Timing stops when speed reaches this value
    #[serde(rename = "end_speed_mph")]
    pub end_mph: f64,
}

/// Complete configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynoConfig {
    /// Vehicle section
    pub vehicle: VehicleProfile,
    /// Test section
    pub test: TestThresholds,
}

impl DynoConfig {
    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: DynoConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::from_json(&content)
    }

    /// Resolve which config file to load
    ///
    /// An explicit path always wins. Otherwise `config.json` in the working
    /// directory is used when present, then `<config dir>/gps-dyno/config.json`.
    /// The returned path may not exist; loading it reports `NotFound`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        match dirs::config_dir() {
            Some(dir) => {
                let user = dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
                if user.exists() {
                    user
                } else {
                    local
                }
            }
            None => local,
        }
    }

    /// Check value ranges that the JSON types alone cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vehicle.name.trim().is_empty() {
            return Err(invalid("vehicle.name", "must not be empty"));
        }

        let weight = self.vehicle.weight_lbs;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(invalid(
                "vehicle.weight_lbs",
                format!("must be a positive number, got {weight}"),
            ));
        }

        let TestThresholds { start_mph, end_mph } = self.test;
        if !start_mph.is_finite() || start_mph < 0.0 {
            return Err(invalid(
                "test.start_speed_mph",
                format!("must be zero or greater, got {start_mph}"),
            ));
        }
        if !end_mph.is_finite() || end_mph <= start_mph {
            return Err(invalid(
                "test.end_speed_mph",
                format!("must be greater than start speed ({start_mph}), got {end_mph}"),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}
