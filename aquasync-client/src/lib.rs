pub mod configs;
pub mod controller;
pub mod error;
pub mod history;
pub mod models;
pub mod store;
pub mod subscription;
pub mod write;

pub use controller::{SyncController, SyncEvents};
pub use error::{ClientError, StoreError};
pub use store::RemoteStore;
