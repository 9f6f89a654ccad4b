use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Invoked with the watched path and its current subtree on every delivery.
pub type ChangeCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Invoked when delivery for a single path fails. Sibling subscriptions
/// are unaffected.
pub type ErrorCallback = Arc<dyn Fn(&str, StoreError) + Send + Sync>;

/// Identifies one active listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(pub u64);

/// Contract of the path-addressable realtime document store.
///
/// The store delivers last-writer-wins values per path and notifies every
/// active listener on each change to a watched subtree. Callbacks may
/// arrive on any task, concurrently with each other and with in-flight
/// writes.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Registers a listener on `path`. The current value (if any) is
    /// delivered once immediately, then again on every subsequent change
    /// to the path or its descendants.
    async fn subscribe(
        &self,
        path: &str,
        on_change: ChangeCallback,
        on_error: ErrorCallback,
    ) -> Result<SubscriptionToken, StoreError>;

    async fn unsubscribe(&self, token: SubscriptionToken);

    /// Replaces the subtree at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Replaces the subtree at `path/{key}`.
    async fn set_child(&self, path: &str, key: &str, value: Value) -> Result<(), StoreError>;

    /// Store-side unique child key, monotonic-ish within one store.
    fn generate_child_key(&self, path: &str) -> String;
}
