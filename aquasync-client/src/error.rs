/// Failures surfaced by a remote store implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Permission denied for {path}")]
    PermissionDenied { path: String },

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Write to {path} rejected: {reason}")]
    WriteRejected { path: String, reason: String },

    #[error("Listener on {path} cancelled: {reason}")]
    ListenerCancelled { path: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local validation failure on a write submission. No remote call
    /// has been made when this is returned.
    #[error("Invalid input: expected a numeric value")]
    InvalidInput,

    /// A write step failed remotely. Steps already completed are not
    /// rolled back; remaining steps were not attempted.
    #[error("Remote write failed: {0}")]
    RemoteWriteFailed(#[from] StoreError),

    #[error("Subscription on {path} could not be established: {source}")]
    SubscriptionFailed {
        path: String,
        source: StoreError,
    },
}
