use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FromSnapshot, Recency, field_f64, field_str};

pub const DEFAULT_UNIT: &str = "NTU";

/// One observed turbidity reading as mirrored from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    /// String-encoded epoch milliseconds; doubles as the history child key
    /// in the timestamp-keyed write mode.
    pub timestamp: String,
    pub unit: String,
    pub source_id: String,
}

impl FromSnapshot for Measurement {
    fn from_snapshot(raw: &Value) -> Self {
        Self {
            value: field_f64(raw, "turbidity").unwrap_or(0.0),
            timestamp: field_str(raw, "timestamp").unwrap_or_default().to_owned(),
            unit: field_str(raw, "unit").unwrap_or(DEFAULT_UNIT).to_owned(),
            source_id: field_str(raw, "device_id").unwrap_or_default().to_owned(),
        }
    }
}

impl Recency for Measurement {
    fn recency_key(&self) -> i64 {
        self.timestamp.parse().unwrap_or(0)
    }
}
