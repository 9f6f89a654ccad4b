use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FromSnapshot, field_f64, field_str};

/// Threshold-breach notification stored under the alerts collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: String,
    pub value: f64,
    pub message: String,
}

impl Alert {
    /// An alert without a kind is treated as absent and never surfaced.
    pub fn is_actionable(&self) -> bool {
        !self.kind.is_empty()
    }
}

impl FromSnapshot for Alert {
    fn from_snapshot(raw: &Value) -> Self {
        Self {
            kind: field_str(raw, "type").unwrap_or_default().to_owned(),
            value: field_f64(raw, "value").unwrap_or(0.0),
            message: field_str(raw, "message").unwrap_or_default().to_owned(),
        }
    }
}
