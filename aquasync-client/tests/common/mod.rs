use std::sync::{Arc, Mutex};

use aquasync_client::configs::SyncConfig;
use aquasync_client::controller::{SyncController, SyncEvents};
use aquasync_client::models::{Alert, DeviceStatus, Measurement};
use aquasync_mock::store::MockStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    CurrentValue(Measurement),
    History(Vec<Measurement>),
    DeviceStatus(DeviceStatus),
    Alert(Alert),
    ConnectionStatus(String, bool),
}

/// Records every sink invocation for later assertion.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, predicate: impl Fn(&SinkEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl SyncEvents for RecordingSink {
    fn on_current_value(&self, measurement: Measurement) {
        self.push(SinkEvent::CurrentValue(measurement));
    }

    fn on_history(&self, entries: Vec<Measurement>) {
        self.push(SinkEvent::History(entries));
    }

    fn on_device_status(&self, status: DeviceStatus) {
        self.push(SinkEvent::DeviceStatus(status));
    }

    fn on_alert(&self, alert: Alert) {
        self.push(SinkEvent::Alert(alert));
    }

    fn on_connection_status(&self, message: &str, connected: bool) {
        self.push(SinkEvent::ConnectionStatus(message.to_string(), connected));
    }
}

pub fn setup() -> (Arc<MockStore>, Arc<RecordingSink>, SyncController) {
    setup_with(SyncConfig::default())
}

pub fn setup_with(config: SyncConfig) -> (Arc<MockStore>, Arc<RecordingSink>, SyncController) {
    let store = Arc::new(MockStore::new());
    let sink = Arc::new(RecordingSink::new());
    let controller = SyncController::new(store.clone(), config, sink.clone());
    (store, sink, controller)
}
