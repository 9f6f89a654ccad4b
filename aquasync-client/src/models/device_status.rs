use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FromSnapshot, field_i64, field_str};

/// Health report published by the sensor device alongside its readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub state: String,
    /// WiFi RSSI in dBm.
    pub signal_strength: i32,
    pub free_memory_bytes: i64,
}

impl FromSnapshot for DeviceStatus {
    fn from_snapshot(raw: &Value) -> Self {
        Self {
            state: field_str(raw, "status").unwrap_or_default().to_owned(),
            signal_strength: field_i64(raw, "wifi_rssi")
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(0),
            free_memory_bytes: field_i64(raw, "free_heap").unwrap_or(0),
        }
    }
}
