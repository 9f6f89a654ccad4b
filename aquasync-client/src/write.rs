use std::sync::Arc;

use serde_json::json;
use time::OffsetDateTime;

use crate::configs::StorePaths;
use crate::error::ClientError;
use crate::store::RemoteStore;

pub(crate) fn epoch_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Ordered multi-step writes against the remote store.
///
/// The steps of one submission are awaited strictly in sequence. There is
/// no atomicity across them: a failure aborts the remaining steps but
/// never rolls back completed ones, so a crash mid-submission can leave
/// the latest value updated without a matching history record. Local
/// state is not touched here at all; the store echoes every accepted
/// write back through the active subscriptions.
pub struct WritePipeline {
    store: Arc<dyn RemoteStore>,
    paths: StorePaths,
    unit: String,
}

impl WritePipeline {
    pub fn new(store: Arc<dyn RemoteStore>, paths: StorePaths, unit: String) -> Self {
        Self { store, paths, unit }
    }

    /// Parses `raw_input` and writes, in order: the latest-value document,
    /// a timestamp-keyed history entry, and (when the value exceeds
    /// `threshold`) an alert document keyed by the same timestamp.
    pub async fn submit_measurement(
        &self,
        raw_input: &str,
        threshold: f64,
        source_id: &str,
    ) -> Result<(), ClientError> {
        let value: f64 = raw_input
            .trim()
            .parse()
            .map_err(|_| ClientError::InvalidInput)?;

        let timestamp = epoch_millis().to_string();

        self.store
            .set(&self.paths.latest, json!({ "turbidity": value }))
            .await?;

        self.store
            .set_child(
                &self.paths.readings,
                &timestamp,
                json!({
                    "turbidity": value,
                    "timestamp": timestamp,
                    "unit": self.unit,
                    "device_id": source_id,
                }),
            )
            .await?;

        if value > threshold {
            self.store
                .set_child(
                    &self.paths.alerts,
                    &timestamp,
                    json!({
                        "type": "high_turbidity",
                        "value": value,
                        "message": format!(
                            "High turbidity detected from {source_id}: {value} {}",
                            self.unit
                        ),
                    }),
                )
                .await?;
            tracing::warn!("submitted value {value} exceeds alert threshold {threshold}");
        }

        tracing::debug!("measurement {value} written at {timestamp}");
        Ok(())
    }

    /// Simple-schema variant: writes the scalar to the latest path, then
    /// appends a `{value, timestamp, source}` entry under a store-generated
    /// push key. No alert step.
    pub async fn push_history_entry(
        &self,
        raw_input: &str,
        source: &str,
    ) -> Result<(), ClientError> {
        let value: i32 = raw_input
            .trim()
            .parse()
            .map_err(|_| ClientError::InvalidInput)?;

        self.store.set(&self.paths.latest, json!(value)).await?;

        let key = self.store.generate_child_key(&self.paths.readings);
        self.store
            .set_child(
                &self.paths.readings,
                &key,
                json!({
                    "value": value,
                    "timestamp": epoch_millis(),
                    "source": source,
                }),
            )
            .await?;

        tracing::debug!("history entry {value} pushed under {key}");
        Ok(())
    }
}
