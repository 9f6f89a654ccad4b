use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{ClientError, StoreError};
use crate::store::{ChangeCallback, ErrorCallback, RemoteStore, SubscriptionToken};

/// Bundle of the registrations created by one `start` call.
///
/// The liveness gate is shared with every wrapped callback: once flipped
/// by `stop`, a late delivery racing the unsubscribe is dropped before it
/// can reach the caller.
struct SubscriptionHandle {
    tokens: Vec<(String, SubscriptionToken)>,
    live: Arc<AtomicBool>,
}

/// Owns the set of currently active path subscriptions. At most one
/// handle is live at a time; it is replaced, never mutated in place.
pub struct SubscriptionRegistry {
    store: Arc<dyn RemoteStore>,
    current: Mutex<Option<SubscriptionHandle>>,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            current: Mutex::new(None),
        }
    }

    /// Registers one listener per path, tearing down any previously
    /// started set first. Re-entrant start is therefore idempotent: after
    /// it returns, exactly one subscription is live per path. The handle
    /// slot stays locked for the whole call, so two racing `start`s
    /// serialize instead of leaking the loser's listeners.
    pub async fn start(
        &self,
        paths: &[String],
        on_change: ChangeCallback,
        on_error: ErrorCallback,
    ) -> Result<(), ClientError> {
        let mut current = self.current.lock().await;
        if let Some(handle) = current.take() {
            self.teardown(handle).await;
        }

        let live = Arc::new(AtomicBool::new(true));
        let mut tokens: Vec<(String, SubscriptionToken)> = Vec::with_capacity(paths.len());

        for path in paths {
            let gated_change = gate_change(&live, &on_change);
            let gated_error = gate_error(&live, &on_error);

            match self.store.subscribe(path, gated_change, gated_error).await {
                Ok(token) => {
                    tracing::debug!("subscribed to {path}");
                    tokens.push((path.clone(), token));
                }
                Err(source) => {
                    // Leave no partial set behind.
                    live.store(false, Ordering::SeqCst);
                    for (_, token) in tokens {
                        self.store.unsubscribe(token).await;
                    }
                    return Err(ClientError::SubscriptionFailed {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        *current = Some(SubscriptionHandle { tokens, live });
        Ok(())
    }

    /// Tears down the active set. After this returns no further change or
    /// error delivery reaches the caller. No-op when nothing is active.
    pub async fn stop(&self) {
        let handle = self.current.lock().await.take();
        if let Some(handle) = handle {
            self.teardown(handle).await;
        }
    }

    async fn teardown(&self, handle: SubscriptionHandle) {
        handle.live.store(false, Ordering::SeqCst);
        for (path, token) in handle.tokens {
            self.store.unsubscribe(token).await;
            tracing::debug!("unsubscribed from {path}");
        }
    }

    pub async fn is_active(&self) -> bool {
        self.current.lock().await.is_some()
    }
}

fn gate_change(live: &Arc<AtomicBool>, inner: &ChangeCallback) -> ChangeCallback {
    let live = Arc::clone(live);
    let inner = Arc::clone(inner);
    Arc::new(move |path: &str, value: &Value| {
        if live.load(Ordering::SeqCst) {
            inner(path, value);
        }
    })
}

fn gate_error(live: &Arc<AtomicBool>, inner: &ErrorCallback) -> ErrorCallback {
    let live = Arc::clone(live);
    let inner = Arc::clone(inner);
    Arc::new(move |path: &str, error: StoreError| {
        if live.load(Ordering::SeqCst) {
            inner(path, error);
        }
    })
}
