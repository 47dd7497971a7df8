pub mod api;
pub mod config;
pub mod error;
pub mod sync;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use sync::{RunOptions, SyncReport};
