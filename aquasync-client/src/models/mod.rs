pub mod alert;
pub mod device_status;
pub mod history_entry;
pub mod measurement;

pub use alert::Alert;
pub use device_status::DeviceStatus;
pub use history_entry::HistoryEntry;
pub use measurement::Measurement;

use serde_json::Value;

/// Total decoding from an untyped store snapshot.
///
/// Decoding never fails: a field that is absent or of the wrong JSON kind
/// resolves to that field's documented default. No cross-kind coercion is
/// performed (a string holding digits is still the wrong kind for a
/// numeric field).
pub trait FromSnapshot: Sized {
    fn from_snapshot(raw: &Value) -> Self;
}

/// Ordering key for projected history, derived from the record's
/// timestamp-like field.
pub trait Recency {
    fn recency_key(&self) -> i64;
}

pub(crate) fn field_f64(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

pub(crate) fn field_i64(raw: &Value, key: &str) -> Option<i64> {
    raw.get(key).and_then(Value::as_i64)
}

pub(crate) fn field_str<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}
