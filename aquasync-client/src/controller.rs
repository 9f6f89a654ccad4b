use std::sync::Arc;

use serde_json::Value;

use crate::configs::{StorePaths, SyncConfig};
use crate::error::{ClientError, StoreError};
use crate::history;
use crate::models::{Alert, DeviceStatus, FromSnapshot, Measurement};
use crate::store::{ChangeCallback, ErrorCallback, RemoteStore};
use crate::subscription::SubscriptionRegistry;
use crate::write::WritePipeline;

/// Downstream sinks supplied by the presentation layer.
///
/// Callbacks may arrive from any task, concurrently with each other and
/// with an in-flight submission; implementations are responsible for any
/// marshaling their rendering context requires.
pub trait SyncEvents: Send + Sync {
    fn on_current_value(&self, measurement: Measurement);
    fn on_history(&self, entries: Vec<Measurement>);
    fn on_device_status(&self, status: DeviceStatus);
    fn on_alert(&self, alert: Alert);
    fn on_connection_status(&self, message: &str, connected: bool);
}

/// Composes the registry, projector and write pipeline over one remote
/// store and one sink set.
///
/// The controller is either stopped or listening; `start` while already
/// listening is legal and re-establishes a clean subscription set.
pub struct SyncController {
    registry: SubscriptionRegistry,
    pipeline: WritePipeline,
    sink: Arc<dyn SyncEvents>,
    config: SyncConfig,
}

impl SyncController {
    pub fn new(store: Arc<dyn RemoteStore>, config: SyncConfig, sink: Arc<dyn SyncEvents>) -> Self {
        Self {
            registry: SubscriptionRegistry::new(Arc::clone(&store)),
            pipeline: WritePipeline::new(store, config.paths.clone(), config.unit.clone()),
            sink,
            config,
        }
    }

    /// Subscribes to the configured paths and routes every delivery to its
    /// sink. Any previously established set is torn down first.
    pub async fn start(&self) -> Result<(), ClientError> {
        let paths = [
            self.config.paths.latest.clone(),
            self.config.paths.readings.clone(),
            self.config.paths.device_status.clone(),
            self.config.paths.alerts.clone(),
        ];

        let on_change: ChangeCallback = {
            let routes = self.config.paths.clone();
            let sink = Arc::clone(&self.sink);
            Arc::new(move |path: &str, value: &Value| route(&routes, sink.as_ref(), path, value))
        };

        let on_error: ErrorCallback = {
            let sink = Arc::clone(&self.sink);
            Arc::new(move |path: &str, error: StoreError| {
                tracing::error!("listener on {path} cancelled: {error}");
                // One failed path does not take its siblings down.
                sink.on_connection_status(&format!("Listener error on {path}: {error}"), true);
            })
        };

        self.registry.start(&paths, on_change, on_error).await?;

        tracing::info!("listening on {} paths", paths.len());
        self.sink
            .on_connection_status("Listening for turbidity data...", true);
        Ok(())
    }

    /// Tears down the active subscription set and reports disconnection.
    /// An in-flight submission is unaffected.
    pub async fn stop(&self) {
        self.registry.stop().await;
        tracing::info!("stopped listening");
        self.sink.on_connection_status("Stopped listening", false);
    }

    pub async fn is_listening(&self) -> bool {
        self.registry.is_active().await
    }

    pub async fn submit_measurement(&self, raw_input: &str) -> Result<(), ClientError> {
        self.pipeline
            .submit_measurement(raw_input, self.config.alert_threshold, &self.config.source_id)
            .await
    }

    pub async fn push_history_entry(&self, raw_input: &str) -> Result<(), ClientError> {
        self.pipeline
            .push_history_entry(raw_input, &self.config.source_id)
            .await
    }
}

fn route(paths: &StorePaths, sink: &dyn SyncEvents, path: &str, value: &Value) {
    if path == paths.latest {
        sink.on_current_value(Measurement::from_snapshot(value));
    } else if path == paths.readings {
        sink.on_history(history::project(value));
    } else if path == paths.device_status {
        sink.on_device_status(DeviceStatus::from_snapshot(value));
    } else if path == paths.alerts {
        // Each alert document is delivered individually, never batched.
        for child in history::children(value) {
            let alert = Alert::from_snapshot(child);
            if alert.is_actionable() {
                sink.on_alert(alert);
            }
        }
    } else {
        tracing::debug!("change on unrouted path {path}");
    }
}
