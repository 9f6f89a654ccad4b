pub mod settings;

pub use settings::{Logger, Settings, StorePaths, SyncConfig};
