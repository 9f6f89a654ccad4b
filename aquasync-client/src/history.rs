use serde_json::Value;

use crate::models::{FromSnapshot, Recency};

/// Child documents of a collection subtree, in the store's own delivery
/// order. Collections with dense numeric keys arrive as arrays.
pub fn children(subtree: &Value) -> Vec<&Value> {
    match subtree {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Decodes every child of a collection subtree and orders the result
/// descending by recency key. Unparsable keys sort as `0`, i.e. last.
///
/// The full sequence is recomputed on every subtree notification;
/// document counts are small enough that correctness beats incremental
/// diffing here. `sort_by` is stable, so equal keys keep the store's
/// child order.
pub fn project<T: FromSnapshot + Recency>(subtree: &Value) -> Vec<T> {
    let mut entries: Vec<T> = children(subtree)
        .into_iter()
        .map(T::from_snapshot)
        .collect();
    entries.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));
    entries
}
