use std::error::Error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// Logical store paths watched and written by the controller. Concrete
/// names are a deployment convention, not part of the core contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePaths {
    pub latest: String,
    pub readings: String,
    pub device_status: String,
    pub alerts: String,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            latest: "latest".to_string(),
            readings: "readings".to_string(),
            device_status: "device_status".to_string(),
            alerts: "alerts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub paths: StorePaths,
    pub alert_threshold: f64,
    pub unit: String,
    /// Identifier stamped on every measurement this client writes.
    pub source_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            paths: StorePaths::default(),
            alert_threshold: 1000.0,
            unit: "NTU".to_string(),
            source_id: "aquasync-app".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub sync: SyncConfig,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::from_toml(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))
    }

    pub fn from_toml(raw: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(raw)?)
    }
}
