use std::sync::Arc;
use std::time::Duration;

use aquasync_client::controller::{SyncController, SyncEvents};
use aquasync_client::models::{Alert, DeviceStatus, Measurement};
use ::time::OffsetDateTime;
use serde_json::json;
use tokio::time;

use crate::settings::Settings;
use crate::store::MockStore;

pub mod settings;
mod simulate;
pub mod store;

/// Sink that logs every delivery; stands in for a presentation layer.
pub struct TracingSink;

impl SyncEvents for TracingSink {
    fn on_current_value(&self, measurement: Measurement) {
        tracing::info!(
            "current turbidity: {} {}",
            measurement.value,
            measurement.unit
        );
    }

    fn on_history(&self, entries: Vec<Measurement>) {
        tracing::info!("history updated: {} readings", entries.len());
    }

    fn on_device_status(&self, status: DeviceStatus) {
        tracing::info!(
            "device: {} | WiFi: {}dBm | heap: {}KB",
            status.state,
            status.signal_strength,
            status.free_memory_bytes / 1024
        );
    }

    fn on_alert(&self, alert: Alert) {
        tracing::warn!("ALERT [{}] {}", alert.kind, alert.message);
    }

    fn on_connection_status(&self, message: &str, connected: bool) {
        tracing::info!("connection: {message} (connected: {connected})");
    }
}

/// Runs a simulated sensor device against the in-memory store, with a
/// sync controller mirroring its writes back into the log.
pub async fn run(settings: &Arc<Settings>) {
    let store = Arc::new(MockStore::new());
    let controller = SyncController::new(
        store.clone(),
        settings.sync.clone(),
        Arc::new(TracingSink),
    );
    controller.start().await.expect("Failed to start controller.");

    let mut interval = time::interval(Duration::from_secs(settings.mock.interval_secs));
    let mut tick: u64 = 0;
    loop {
        interval.tick().await;
        publish_device_frame(&store, settings, tick);
        tick += 1;
    }
}

/// One device reporting cycle: reading, status, and an alert when the
/// value crosses the configured threshold. Mirrors what the embedded
/// sensor firmware writes.
fn publish_device_frame(store: &MockStore, settings: &Settings, tick: u64) {
    const FRAMES_PER_CYCLE: u64 = 180;

    let day_fraction = (tick % FRAMES_PER_CYCLE) as f64 / FRAMES_PER_CYCLE as f64;
    let (turbidity, rssi, free_heap) = {
        let mut rng = rand::rng();
        (
            simulate::simulated_turbidity(day_fraction, &mut rng),
            simulate::simulated_rssi(&mut rng),
            simulate::simulated_free_heap(&mut rng),
        )
    };

    let paths = &settings.sync.paths;
    let timestamp = ((OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64)
        .to_string();

    store.inject(&paths.latest, json!({ "turbidity": turbidity }));
    store.inject(
        &format!("{}/{}", paths.readings, timestamp),
        json!({
            "turbidity": turbidity,
            "timestamp": timestamp,
            "unit": settings.sync.unit,
            "device_id": settings.mock.device_id,
        }),
    );
    store.inject(
        &paths.device_status,
        json!({
            "status": "online",
            "wifi_rssi": rssi,
            "free_heap": free_heap,
        }),
    );

    if turbidity > settings.sync.alert_threshold {
        store.inject(
            &format!("{}/{}", paths.alerts, timestamp),
            json!({
                "type": "high_turbidity",
                "value": turbidity,
                "message": format!(
                    "High turbidity detected from {}: {turbidity} {}",
                    settings.mock.device_id, settings.sync.unit
                ),
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use aquasync_client::configs::{Logger, SyncConfig};

    use super::*;
    use crate::settings::Mock;

    fn test_settings() -> Settings {
        Settings {
            logger: Logger {
                level: "debug".to_string(),
            },
            sync: SyncConfig::default(),
            mock: Mock {
                interval_secs: 1,
                device_id: "ESP32-TEST".to_string(),
            },
        }
    }

    #[test]
    fn test_device_frame_writes_reading_with_millis_timestamp() {
        let store = MockStore::new();
        let settings = test_settings();

        publish_device_frame(&store, &settings, 0);

        let latest = store.value_at("latest").unwrap();
        assert!(latest["turbidity"].as_f64().unwrap() >= 0.0);

        let readings = store.value_at("readings").unwrap();
        let (key, entry) = readings.as_object().unwrap().iter().next().unwrap();
        assert_eq!(entry["timestamp"], json!(key));
        assert!(key.parse::<i64>().unwrap() > 0);
        assert_eq!(entry["device_id"], "ESP32-TEST");
    }
}
