use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use aquasync_client::error::StoreError;
use aquasync_client::store::{ChangeCallback, ErrorCallback, RemoteStore, SubscriptionToken};

/// One remote call recorded by the store, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set { path: String, value: Value },
    SetChild { path: String, key: String, value: Value },
}

struct Subscriber {
    path: String,
    on_change: ChangeCallback,
    on_error: ErrorCallback,
}

struct Inner {
    root: Value,
    subscribers: HashMap<u64, Subscriber>,
    // Kept after unsubscribe so tests can race a late delivery.
    stale: Vec<Subscriber>,
    next_token: u64,
    child_counter: u64,
    write_log: Vec<WriteOp>,
    fail_paths: HashSet<String>,
}

/// In-memory stand-in for the realtime document store.
///
/// Callbacks are invoked synchronously from the mutating call, which makes
/// test assertions deterministic. Each failure armed via `fail_writes_to`
/// rejects exactly one write.
pub struct MockStore {
    inner: Mutex<Inner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                root: Value::Object(Map::new()),
                subscribers: HashMap::new(),
                stale: Vec::new(),
                next_token: 0,
                child_counter: 0,
                write_log: Vec::new(),
                fail_paths: HashSet::new(),
            }),
        }
    }

    /// Device-side write: updates the tree and notifies listeners without
    /// appearing in the client write log.
    pub fn inject(&self, path: &str, value: Value) {
        {
            let mut inner = self.inner.lock().unwrap();
            *lookup_mut(&mut inner.root, path) = value;
        }
        self.notify(path);
    }

    pub fn value_at(&self, path: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap();
        lookup(&inner.root, path).cloned()
    }

    pub fn writes(&self) -> Vec<WriteOp> {
        self.inner.lock().unwrap().write_log.clone()
    }

    pub fn active_listeners(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Arms a one-shot rejection for the next write addressing `path`.
    pub fn fail_writes_to(&self, path: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_paths
            .insert(path.to_string());
    }

    /// Delivers the current value of `path` through listeners that were
    /// already unsubscribed, simulating a callback racing the teardown.
    pub fn fire_stale(&self, path: &str) {
        let targets: Vec<(String, ChangeCallback, Value)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .stale
                .iter()
                .filter(|s| related(&s.path, path))
                .map(|s| {
                    let snapshot = lookup(&inner.root, &s.path).cloned().unwrap_or(Value::Null);
                    (s.path.clone(), s.on_change.clone(), snapshot)
                })
                .collect()
        };
        for (watched, on_change, snapshot) in targets {
            on_change(&watched, &snapshot);
        }
    }

    /// Cancels delivery for the active listeners on `path` without
    /// touching sibling subscriptions.
    pub fn fail_listener(&self, path: &str) {
        let targets: Vec<(String, ErrorCallback)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .subscribers
                .values()
                .filter(|s| s.path == path)
                .map(|s| (s.path.clone(), s.on_error.clone()))
                .collect()
        };
        for (watched, on_error) in targets {
            on_error(
                &watched,
                StoreError::ListenerCancelled {
                    path: watched.clone(),
                    reason: "simulated cancellation".to_string(),
                },
            );
        }
    }

    fn notify(&self, changed: &str) {
        let targets: Vec<(String, ChangeCallback, Value)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .subscribers
                .values()
                .filter(|s| related(&s.path, changed))
                .map(|s| {
                    let snapshot = lookup(&inner.root, &s.path).cloned().unwrap_or(Value::Null);
                    (s.path.clone(), s.on_change.clone(), snapshot)
                })
                .collect()
        };
        for (watched, on_change, snapshot) in targets {
            on_change(&watched, &snapshot);
        }
    }

    fn take_failure(&self, path: &str) -> Option<StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_paths.remove(path) {
            Some(StoreError::WriteRejected {
                path: path.to_string(),
                reason: "simulated write failure".to_string(),
            })
        } else {
            None
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn subscribe(
        &self,
        path: &str,
        on_change: ChangeCallback,
        on_error: ErrorCallback,
    ) -> Result<SubscriptionToken, StoreError> {
        let (token, snapshot) = {
            let mut inner = self.inner.lock().unwrap();
            let token = SubscriptionToken(inner.next_token);
            inner.next_token += 1;
            inner.subscribers.insert(
                token.0,
                Subscriber {
                    path: path.to_string(),
                    on_change: on_change.clone(),
                    on_error,
                },
            );
            let snapshot = lookup(&inner.root, path).cloned().unwrap_or(Value::Null);
            (token, snapshot)
        };

        // Initial delivery with the current value.
        on_change(path, &snapshot);
        Ok(token)
    }

    async fn unsubscribe(&self, token: SubscriptionToken) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(subscriber) = inner.subscribers.remove(&token.0) {
            inner.stale.push(subscriber);
        }
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        if let Some(error) = self.take_failure(path) {
            return Err(error);
        }
        {
            let mut inner = self.inner.lock().unwrap();
            inner.write_log.push(WriteOp::Set {
                path: path.to_string(),
                value: value.clone(),
            });
            *lookup_mut(&mut inner.root, path) = value;
        }
        self.notify(path);
        Ok(())
    }

    async fn set_child(&self, path: &str, key: &str, value: Value) -> Result<(), StoreError> {
        if let Some(error) = self.take_failure(path) {
            return Err(error);
        }
        let child_path = format!("{path}/{key}");
        {
            let mut inner = self.inner.lock().unwrap();
            inner.write_log.push(WriteOp::SetChild {
                path: path.to_string(),
                key: key.to_string(),
                value: value.clone(),
            });
            *lookup_mut(&mut inner.root, &child_path) = value;
        }
        self.notify(&child_path);
        Ok(())
    }

    fn generate_child_key(&self, _path: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.child_counter += 1;
        let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        format!("{millis:013}-{:04}", inner.child_counter)
    }
}

fn related(watched: &str, changed: &str) -> bool {
    watched == changed
        || changed.starts_with(&format!("{watched}/"))
        || watched.starts_with(&format!("{changed}/"))
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        node = node.get(segment)?;
    }
    Some(node)
}

fn lookup_mut<'a>(root: &'a mut Value, path: &str) -> &'a mut Value {
    let mut node = root;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .unwrap()
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node
}
