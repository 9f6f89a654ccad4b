use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FromSnapshot, Recency, field_i64, field_str};

pub const DEFAULT_SOURCE: &str = "Unknown";

/// Entry of the simple integer history schema used by the secondary
/// deployment variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub value: i32,
    pub timestamp_millis: i64,
    pub source: String,
}

impl FromSnapshot for HistoryEntry {
    fn from_snapshot(raw: &Value) -> Self {
        Self {
            value: field_i64(raw, "value")
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(0),
            timestamp_millis: field_i64(raw, "timestamp").unwrap_or(0),
            source: field_str(raw, "source").unwrap_or(DEFAULT_SOURCE).to_owned(),
        }
    }
}

impl Recency for HistoryEntry {
    fn recency_key(&self) -> i64 {
        self.timestamp_millis
    }
}
